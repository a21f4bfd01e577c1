#[derive(tripform::form::FormModel)]
struct Profile {
    #[form(rename)]
    email: String,
}

fn main() {
    let profile = Profile {
        email: String::new(),
    };
    let _ = profile.email;
}
