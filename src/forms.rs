use std::sync::LazyLock;

use regex::Regex;

use crate::form::{FieldConfig, FieldRegistry, FormController, FormModel, Rule};
use crate::itinerary::{BudgetType, TripRequest};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

static ISO_DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$")
        .expect("date pattern is a valid regex")
});

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_DESTINATION_LENGTH: usize = 120;

fn email_rules() -> FieldConfig<String> {
    FieldConfig::new(String::new())
        .rule(Rule::required("Email is required"))
        .rule(Rule::pattern(EMAIL_PATTERN.clone(), "Invalid email"))
}

fn password_rules() -> FieldConfig<String> {
    FieldConfig::new(String::new())
        .rule(Rule::required("Password is required"))
        .rule(Rule::min_length(
            MIN_PASSWORD_LENGTH,
            format!("Password must have at least {MIN_PASSWORD_LENGTH} characters"),
        ))
}

fn date_rules(required: &'static str) -> FieldConfig<String> {
    FieldConfig::new(String::new())
        .rule(Rule::required(required))
        .rule(Rule::pattern(
            ISO_DATE_PATTERN.clone(),
            "Use the YYYY-MM-DD format",
        ))
}

#[derive(Clone, Debug, Default, PartialEq, FormModel)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn registry() -> FieldRegistry<Self> {
        let fields = Self::fields();
        FieldRegistry::default()
            .field(fields.email(), email_rules())
            .field(fields.password(), password_rules())
    }

    pub fn controller() -> FormController<Self> {
        FormController::new(Self::registry())
    }
}

#[derive(Clone, Debug, Default, PartialEq, FormModel)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn registry() -> FieldRegistry<Self> {
        let fields = Self::fields();
        FieldRegistry::default()
            .field(
                fields.name(),
                FieldConfig::new(String::new()).rule(Rule::required("Name is required")),
            )
            .field(fields.email(), email_rules())
            .field(fields.password(), password_rules())
            .field(
                fields.confirm_password(),
                FieldConfig::new(String::new()).rule(Rule::required("Confirm your password")),
            )
            .cross_check(
                fields.confirm_password(),
                "Passwords do not match",
                |form: &RegisterForm| form.confirm_password == form.password,
            )
    }

    pub fn controller() -> FormController<Self> {
        FormController::new(Self::registry())
    }
}

#[derive(Clone, Debug, PartialEq, FormModel)]
pub struct TripRequestForm {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    pub travelers: u32,
    pub budget: BudgetType,
}

impl Default for TripRequestForm {
    fn default() -> Self {
        Self {
            destination: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            travelers: 1,
            budget: BudgetType::default(),
        }
    }
}

impl TripRequestForm {
    pub fn registry() -> FieldRegistry<Self> {
        let fields = Self::fields();
        FieldRegistry::default()
            .field(
                fields.destination(),
                FieldConfig::new(String::new())
                    .rule(Rule::required("Destination is required"))
                    .rule(Rule::max_length(
                        MAX_DESTINATION_LENGTH,
                        "Destination is too long",
                    )),
            )
            .field(fields.start_date(), date_rules("Start date is required"))
            .field(fields.end_date(), date_rules("End date is required"))
            .cross_check(
                fields.end_date(),
                "End date must be after the start date",
                |form: &TripRequestForm| {
                    !ISO_DATE_PATTERN.is_match(&form.start_date) || form.end_date > form.start_date
                },
            )
            .field(
                fields.travelers(),
                FieldConfig::new(1).rule(Rule::custom(
                    |travelers: &u32| *travelers >= 1,
                    "At least one traveler is required",
                )),
            )
    }

    pub fn controller() -> FormController<Self> {
        FormController::new(Self::registry())
    }

    pub fn to_request(&self) -> TripRequest {
        TripRequest {
            destination: self.destination.trim().to_string(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            budget: self.budget,
            travelers: self.travelers,
        }
    }
}
