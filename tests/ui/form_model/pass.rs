use tripform::form::{FieldLens, FormModel};

#[derive(Clone, tripform::form::FormModel)]
struct DemoForm {
    email: String,
    travelers: u32,
    #[form(skip)]
    draft_note: String,
}

fn main() {
    let fields = DemoForm::fields();
    let lens = fields.email();
    let mut model = DemoForm {
        email: "a@trip.io".to_string(),
        travelers: 1,
        draft_note: String::new(),
    };
    lens.set(&mut model, "b@trip.io".to_string());
    fields.travelers().set(&mut model, 3);
    assert_eq!(lens.key().as_str(), "email");
    assert_eq!(lens.get(&model), "b@trip.io");
    assert_eq!(*fields.travelers().get(&model), 3);
    assert_eq!(DemoFormFields::KEYS.len(), 2);
    assert!(model.draft_note.is_empty());
}
