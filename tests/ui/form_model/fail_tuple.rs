#[derive(tripform::form::FormModel)]
struct Coordinates(f64, f64);

fn main() {
    let point = Coordinates(1.0, 2.0);
    let _ = point.0 + point.1;
}
