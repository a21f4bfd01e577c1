#[derive(tripform::form::FormModel)]
struct Generic<T> {
    value: T,
}

fn main() {
    let generic = Generic { value: 1u8 };
    let _ = generic.value;
}
