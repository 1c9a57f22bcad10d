use crate::types::{FormField, FormState};
use crate::utils::is_valid_address;
use std::collections::BTreeMap;

/// Field-to-message map produced by one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FormField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: FormField, message: &str) {
        self.0.entry(field).or_insert_with(|| message.to_string());
    }
}

/// Outcome of validating a form state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub is_valid: bool,
    pub errors: ValidationErrors,
}

/// Check a form state against the add-member schema.
///
/// Every field is checked so the caller can show all messages at once;
/// a field reports only its first failing rule.
pub fn validate(state: &FormState) -> Validation {
    let mut errors = ValidationErrors::default();

    if state.governed_account.is_none() {
        errors.insert(FormField::GovernedAccount, "Program governed account is required");
    }

    check_address(
        &mut errors,
        FormField::Vault,
        &state.vault,
        "Vault is required",
        "Invalid Vault Account",
    );
    check_address(
        &mut errors,
        FormField::Member,
        &state.member,
        "Member is required",
        "Invalid Member Account",
    );

    Validation {
        is_valid: errors.is_empty(),
        errors,
    }
}

fn check_address(
    errors: &mut ValidationErrors,
    field: FormField,
    value: &str,
    required: &str,
    invalid: &str,
) {
    if value.is_empty() {
        errors.insert(field, required);
    } else if !is_valid_address(value) {
        errors.insert(field, invalid);
    }
}
