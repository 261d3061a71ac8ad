use lazy_static::lazy_static;
use regex::Regex;
use serde_derive::Deserialize;
use thiserror::Error;

use crate::catalog::{Catalog, Event};
use crate::money::group_thousands;

pub const INVALID_MESSAGE: &str = "Please provide valid name, email, and quantity.";
pub const NOT_FOUND_MESSAGE: &str = "Event not found.";

lazy_static! {
    static ref EMAIL_LOCAL: Regex = Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~.-]+$").unwrap();
    static ref EMAIL_LABEL: Regex =
        Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$").unwrap();
}

/// The reservation form fields exactly as posted.
#[derive(Debug, Default, Deserialize)]
pub struct ReservationForm {
    pub event_id: Option<String>,
    pub quantity: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub purchase: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Reservation {
    pub event_id: u64,
    pub quantity: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Invalid {
    #[error("event id is not a positive integer")]
    EventId,
    #[error("quantity is not a positive integer")]
    Quantity,
    #[error("name is blank")]
    Name,
    #[error("email is not a valid address")]
    Email,
    #[error("total overflows")]
    Total,
    #[error("form body is malformed")]
    Malformed,
}

impl ReservationForm {
    pub fn from_form_body(buf: &[u8]) -> Result<ReservationForm, serde_urlencoded::de::Error> {
        serde_urlencoded::from_bytes(buf)
    }

    /// Plain page loads post without the `purchase` button field.
    pub fn is_submission(&self) -> bool {
        self.purchase.is_some()
    }

    pub fn parse(&self) -> Result<Reservation, Invalid> {
        let event_id = positive_integer(self.event_id.as_deref().unwrap_or("0"))
            .ok_or(Invalid::EventId)?;
        let quantity = positive_integer(self.quantity.as_deref().unwrap_or("1"))
            .ok_or(Invalid::Quantity)?;
        let name = self.name.as_deref().unwrap_or("").trim();
        if name.is_empty() {
            return Err(Invalid::Name);
        }
        let email = self.email.as_deref().unwrap_or("").trim();
        if !is_valid_email(email) {
            return Err(Invalid::Email);
        }
        Ok(Reservation {
            event_id,
            quantity,
            name: name.to_owned(),
            email: email.to_owned(),
        })
    }
}

fn positive_integer(field: &str) -> Option<u64> {
    field.trim().parse::<u64>().ok().filter(|value| *value > 0)
}

pub fn is_valid_email(email: &str) -> bool {
    let (local, domain) = match email.rsplit_once('@') {
        Some(parts) => parts,
        None => return false,
    };
    if email.len() > 254 || local.is_empty() || local.len() > 64 {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    if !EMAIL_LOCAL.is_match(local) {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| EMAIL_LABEL.is_match(label))
}

#[derive(Debug)]
pub enum Outcome<'a> {
    Invalid(Invalid),
    EventNotFound { event_id: u64 },
    Confirmed(Confirmation<'a>),
}

#[derive(Debug)]
pub struct Confirmation<'a> {
    pub reservation: Reservation,
    pub event: &'a Event,
    pub total: u64,
}

/// Validates a reservation and works out what it would cost. Nothing is
/// stored and nothing is sent.
pub fn process<'a>(catalog: &'a Catalog, form: &ReservationForm) -> Outcome<'a> {
    let reservation = match form.parse() {
        Ok(reservation) => reservation,
        Err(invalid) => return Outcome::Invalid(invalid),
    };
    let event = match catalog.find(reservation.event_id) {
        Some(event) => event,
        None => {
            return Outcome::EventNotFound {
                event_id: reservation.event_id,
            }
        }
    };
    match event.price.checked_mul(reservation.quantity) {
        Some(total) => Outcome::Confirmed(Confirmation {
            reservation,
            event,
            total,
        }),
        None => Outcome::Invalid(Invalid::Total),
    }
}

impl Outcome<'_> {
    pub fn message(&self, currency: &str) -> String {
        match self {
            Outcome::Invalid(..) => INVALID_MESSAGE.to_owned(),
            Outcome::EventNotFound { .. } => NOT_FOUND_MESSAGE.to_owned(),
            Outcome::Confirmed(Confirmation {
                reservation,
                event,
                total,
            }) => format!(
                "Thank you, {}! Your {} ticket(s) for '{}' have been reserved. Total: {}{}. \
                 A confirmation email will be sent to {}. (Demo only)",
                reservation.name,
                reservation.quantity,
                event.title,
                currency,
                group_thousands(*total),
                reservation.email
            ),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Outcome::Invalid(..) => "invalid",
            Outcome::EventNotFound { .. } => "event_not_found",
            Outcome::Confirmed(..) => "confirmed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::event;

    fn form(event_id: &str, quantity: &str, name: &str, email: &str) -> ReservationForm {
        ReservationForm {
            event_id: Some(event_id.to_owned()),
            quantity: Some(quantity.to_owned()),
            name: Some(name.to_owned()),
            email: Some(email.to_owned()),
            purchase: Some(String::new()),
        }
    }

    fn two_event_catalog() -> Catalog {
        Catalog::new(vec![
            event(1, "Summer Beats Festival", "2025-09-05", "Lagos", 4500),
            event(3, "Indie Live", "2025-09-28", "Lagos", 3000),
        ])
        .unwrap()
    }

    #[test]
    fn confirms_ada_for_two_tickets() {
        let catalog = two_event_catalog();
        let outcome = process(&catalog, &form("1", "2", "Ada", "ada@example.com"));
        match &outcome {
            Outcome::Confirmed(confirmation) => {
                assert_eq!(confirmation.total, 9000);
                assert_eq!(confirmation.event.title, "Summer Beats Festival");
            }
            other => panic!("expected confirmation, got {:?}", other),
        }
        let message = outcome.message("₦");
        assert_eq!(
            message,
            "Thank you, Ada! Your 2 ticket(s) for 'Summer Beats Festival' have been reserved. \
             Total: ₦9,000. A confirmation email will be sent to ada@example.com. (Demo only)"
        );
    }

    #[test]
    fn total_is_price_times_quantity() {
        let catalog = two_event_catalog();
        for quantity in 1..=25u32 {
            let outcome = process(
                &catalog,
                &form("3", &quantity.to_string(), "Grace", "grace@example.org"),
            );
            match outcome {
                Outcome::Confirmed(confirmation) => {
                    assert_eq!(confirmation.total, 3000 * u64::from(quantity))
                }
                other => panic!("expected confirmation, got {:?}", other),
            }
        }
    }

    #[test]
    fn trims_name_and_email() {
        let reservation = form(" 3 ", "1", "  Ada  ", " ada@example.com ").parse().unwrap();
        assert_eq!(
            reservation,
            Reservation {
                event_id: 3,
                quantity: 1,
                name: "Ada".to_owned(),
                email: "ada@example.com".to_owned(),
            }
        );
    }

    #[test]
    fn quantity_defaults_to_one() {
        let mut form = form("1", "", "Ada", "ada@example.com");
        form.quantity = None;
        assert_eq!(form.parse().unwrap().quantity, 1);
    }

    #[test]
    fn zero_quantity_is_advisory() {
        let catalog = two_event_catalog();
        let outcome = process(&catalog, &form("1", "0", "Ada", "ada@example.com"));
        assert_eq!(outcome.message("₦"), INVALID_MESSAGE);
    }

    #[test]
    fn each_bad_field_is_advisory() {
        let catalog = two_event_catalog();
        let cases = vec![
            (form("0", "1", "Ada", "ada@example.com"), Invalid::EventId),
            (form("-4", "1", "Ada", "ada@example.com"), Invalid::EventId),
            (form("one", "1", "Ada", "ada@example.com"), Invalid::EventId),
            (form("1", "-2", "Ada", "ada@example.com"), Invalid::Quantity),
            (form("1", "two", "Ada", "ada@example.com"), Invalid::Quantity),
            (form("1", "", "Ada", "ada@example.com"), Invalid::Quantity),
            (form("1", "1", "   ", "ada@example.com"), Invalid::Name),
            (form("1", "1", "Ada", "ada.example.com"), Invalid::Email),
        ];
        for (form, expected) in cases {
            match process(&catalog, &form) {
                Outcome::Invalid(invalid) => assert_eq!(invalid, expected, "{:?}", form),
                other => panic!("expected advisory for {:?}, got {:?}", form, other),
            }
        }
    }

    #[test]
    fn quantity_beyond_u32_is_confirmed() {
        let catalog = Catalog::demo();
        let outcome = process(&catalog, &form("1", "5000000000", "Ada", "ada@example.com"));
        match &outcome {
            Outcome::Confirmed(confirmation) => {
                assert_eq!(confirmation.reservation.quantity, 5_000_000_000);
                assert_eq!(confirmation.total, 22_500_000_000_000);
            }
            other => panic!("expected confirmation, got {:?}", other),
        }
        assert!(outcome.message("₦").contains("Total: ₦22,500,000,000,000."));
    }

    #[test]
    fn event_id_beyond_u32_is_not_found() {
        let catalog = Catalog::demo();
        let outcome = process(&catalog, &form("4294967296", "1", "Ada", "ada@example.com"));
        assert_eq!(outcome.kind(), "event_not_found");
        assert_eq!(outcome.message("₦"), NOT_FOUND_MESSAGE);
    }

    #[test]
    fn unknown_event_is_not_found() {
        let catalog = two_event_catalog();
        let outcome = process(&catalog, &form("2", "1", "Ada", "ada@example.com"));
        assert_eq!(outcome.message("₦"), NOT_FOUND_MESSAGE);
        assert_eq!(outcome.kind(), "event_not_found");
    }

    #[test]
    fn processing_is_repeatable() {
        let catalog = two_event_catalog();
        let submitted = form("3", "4", "Ada", "ada@example.com");
        assert_eq!(
            process(&catalog, &submitted).message("$"),
            process(&catalog, &submitted).message("$")
        );
    }

    #[test]
    fn overflowing_total_is_advisory() {
        let catalog =
            Catalog::new(vec![event(1, "Gala", "2025-12-31", "Lagos", u64::MAX)]).unwrap();
        let outcome = process(&catalog, &form("1", "2", "Ada", "ada@example.com"));
        assert_eq!(outcome.kind(), "invalid");
    }

    #[test]
    fn submission_needs_purchase_flag() {
        let posted = ReservationForm::from_form_body(b"event_id=1&name=Ada").unwrap();
        assert!(!posted.is_submission());
        let posted =
            ReservationForm::from_form_body(b"event_id=1&name=Ada&purchase=").unwrap();
        assert!(posted.is_submission());
    }

    #[test]
    fn email_syntax() {
        for valid in &[
            "ada@example.com",
            "ada.lovelace+tickets@mail.example.co.uk",
            "o'brien@example.ng",
        ] {
            assert!(is_valid_email(valid), "{}", valid);
        }
        for invalid in &[
            "",
            "ada",
            "ada@",
            "@example.com",
            "ada@localhost",
            "ada@@example.com",
            ".ada@example.com",
            "ada.@example.com",
            "a..da@example.com",
            "ada@-example.com",
            "ada@example..com",
            "ada lovelace@example.com",
        ] {
            assert!(!is_valid_email(invalid), "{}", invalid);
        }
    }
}
