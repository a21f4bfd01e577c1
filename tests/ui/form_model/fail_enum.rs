#[derive(tripform::form::FormModel)]
enum Budget {
    Economic,
    Premium,
}

fn main() {
    let _ = [Budget::Economic, Budget::Premium];
}
