#[derive(tripform::form::FormModel)]
struct Trip {
    start_date: String,
    _start_date: String,
}

fn main() {
    let trip = Trip {
        start_date: String::new(),
        _start_date: String::new(),
    };
    let _ = (trip.start_date, trip._start_date);
}
