//! Dialog handlers: one per facet kind.
//!
//! A handler normalizes the confirmed payload, writes the canonical draft to
//! the session store and echoes it back. Malformed payloads are rejected with
//! a [`ValidationError`] naming the field; nothing is stored in that case.

use crate::domain::facet::{AddressDraft, ContactDraft, FacetDraft, FacetPayload, NoteDraft, TimeDraft};
use crate::domain::types::{
    BuildingNumber, CustomerName, DeliveryNote, PhoneNumber, Pincode, ScheduledTime, Street, Town,
    ValidationError,
};
use crate::services::ServiceResult;
use crate::store::DraftWriter;

/// Runs `payload` through the handler of its kind and stores the result.
pub fn handle<S>(store: &S, calling_code: u16, payload: FacetPayload) -> ServiceResult<FacetDraft>
where
    S: DraftWriter + ?Sized,
{
    let draft = match payload {
        FacetPayload::Contact(raw) => FacetDraft::Contact(contact(raw, calling_code)?),
        FacetPayload::Address(raw) => FacetDraft::Address(address(raw)?),
        FacetPayload::Time(raw) => FacetDraft::Time(time(raw)?),
        FacetPayload::Notes(raw) => FacetDraft::Notes(notes(raw)?),
    };

    store.put_draft(&draft).map_err(|err| {
        log::error!("Failed to store {} draft: {err}", draft.kind());
        err
    })?;

    Ok(draft)
}

fn contact(raw: ContactDraft, calling_code: u16) -> Result<ContactDraft, ValidationError> {
    let name = CustomerName::new(raw.name)
        .map_err(|e| ValidationError::from_constraint("name", e))?;
    let phone_number = raw.phone_number.trim().to_string();
    // The raw form is kept; it only has to be normalizable.
    PhoneNumber::from_dialed(&phone_number, calling_code)
        .map_err(|e| ValidationError::from_constraint("phoneNumber", e))?;

    Ok(ContactDraft {
        name: name.into_inner(),
        phone_number,
    })
}

fn address(raw: AddressDraft) -> Result<AddressDraft, ValidationError> {
    let building_number = BuildingNumber::new(raw.building_number)
        .map_err(|e| ValidationError::from_constraint("buildingNumber", e))?;
    let street =
        Street::new(raw.street).map_err(|e| ValidationError::from_constraint("street", e))?;
    let town = Town::new(raw.town).map_err(|e| ValidationError::from_constraint("town", e))?;
    let pincode =
        Pincode::new(raw.pincode).map_err(|e| ValidationError::from_constraint("pincode", e))?;

    Ok(AddressDraft {
        building_number: building_number.into_inner(),
        street: street.into_inner(),
        town: town.into_inner(),
        pincode: pincode.into_inner(),
    })
}

fn time(raw: TimeDraft) -> Result<TimeDraft, ValidationError> {
    if raw.asap {
        return Ok(TimeDraft::default());
    }
    let scheduled = ScheduledTime::new(raw.scheduled_time)
        .map_err(|e| ValidationError::from_constraint("scheduledTime", e))?;

    Ok(TimeDraft {
        asap: false,
        scheduled_time: scheduled.into_inner(),
    })
}

fn notes(raw: NoteDraft) -> Result<NoteDraft, ValidationError> {
    let note =
        DeliveryNote::new(raw.notes).map_err(|e| ValidationError::from_constraint("notes", e))?;

    Ok(NoteDraft {
        notes: note.into_inner(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::facet::FacetKind;
    use crate::services::ServiceError;
    use crate::store::{DraftReader, MemoryStore};

    #[test]
    fn contact_is_trimmed_stored_and_echoed() {
        let store = MemoryStore::new();
        let payload = FacetPayload::Contact(ContactDraft {
            name: "  Ada Lovelace ".into(),
            phone_number: " +49-15551234 ".into(),
        });

        let draft = handle(&store, 49, payload).expect("valid contact");

        let expected = ContactDraft {
            name: "Ada Lovelace".into(),
            phone_number: "+49-15551234".into(),
        };
        assert_eq!(draft, FacetDraft::Contact(expected.clone()));
        assert_eq!(store.contact_draft().unwrap(), Some(expected));
    }

    #[test]
    fn contact_without_name_is_rejected_and_not_stored() {
        let store = MemoryStore::new();
        let payload = FacetPayload::Contact(ContactDraft {
            name: " ".into(),
            phone_number: "+49-15551234".into(),
        });

        let err = handle(&store, 49, payload).unwrap_err();

        assert!(matches!(err, ServiceError::Validation(ref e) if e.field == "name"));
        assert_eq!(store.get_draft(FacetKind::Contact).unwrap(), None);
    }

    #[test]
    fn contact_with_garbage_phone_names_the_field() {
        let store = MemoryStore::new();
        let payload = FacetPayload::Contact(ContactDraft {
            name: "Ada".into(),
            phone_number: "+49-call me".into(),
        });

        let err = handle(&store, 49, payload).unwrap_err();

        assert!(matches!(err, ServiceError::Validation(ref e) if e.field == "phoneNumber"));
    }

    #[test]
    fn address_requires_every_field() {
        let store = MemoryStore::new();
        let payload = FacetPayload::Address(AddressDraft {
            building_number: "12".into(),
            street: "Main St".into(),
            town: "".into(),
            pincode: "10115".into(),
        });

        let err = handle(&store, 49, payload).unwrap_err();

        assert!(matches!(err, ServiceError::Validation(ref e) if e.field == "town"));
        assert_eq!(store.draft_writes(), 0);
    }

    #[test]
    fn asap_time_clears_the_scheduled_slot() {
        let store = MemoryStore::new();
        let payload = FacetPayload::Time(TimeDraft {
            asap: true,
            scheduled_time: "19:30".into(),
        });

        let draft = handle(&store, 49, payload).unwrap();

        assert_eq!(draft, FacetDraft::Time(TimeDraft::default()));
    }

    #[test]
    fn scheduled_time_needs_a_slot() {
        let store = MemoryStore::new();
        let payload = FacetPayload::Time(TimeDraft {
            asap: false,
            scheduled_time: "  ".into(),
        });

        let err = handle(&store, 49, payload).unwrap_err();

        assert!(matches!(err, ServiceError::Validation(ref e) if e.field == "scheduledTime"));
    }

    #[test]
    fn empty_notes_are_allowed() {
        let store = MemoryStore::new();

        let draft = handle(&store, 49, FacetPayload::Notes(NoteDraft::default())).unwrap();

        assert_eq!(draft, FacetDraft::Notes(NoteDraft::default()));
        assert_eq!(store.note_draft().unwrap(), Some(NoteDraft::default()));
    }

    #[test]
    fn notes_are_stored_as_typed() {
        let store = MemoryStore::new();
        let typed = NoteDraft {
            notes: "Fish & chips, gate <3".into(),
        };

        let first = handle(&store, 49, FacetPayload::Notes(typed.clone())).unwrap();
        let FacetDraft::Notes(stored) = first else {
            panic!("expected a note draft");
        };
        let second = handle(&store, 49, FacetPayload::Notes(stored)).unwrap();

        assert_eq!(second, FacetDraft::Notes(typed.clone()));
        assert_eq!(store.note_draft().unwrap(), Some(typed));
    }
}
