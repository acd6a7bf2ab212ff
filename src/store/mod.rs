//! Per-session storage of facet drafts and checkout bookkeeping.
//!
//! Only the dialog handlers write drafts; the order-detail synchronizer reads
//! them while seeding. Everything here is synchronous and local.

use crate::domain::customer::TransportIds;
use crate::domain::facet::{AddressDraft, ContactDraft, FacetDraft, FacetKind, NoteDraft, TimeDraft};
use crate::domain::order::PaymentMethod;
use crate::store::errors::StoreResult;

pub mod errors;
pub mod memory;
pub mod session;

pub use memory::MemoryStore;
pub use session::CheckoutSession;

pub trait DraftReader {
    /// Returns the stored draft for `kind`, or `None` if never set.
    fn get_draft(&self, kind: FacetKind) -> StoreResult<Option<FacetDraft>>;

    fn contact_draft(&self) -> StoreResult<Option<ContactDraft>> {
        Ok(match self.get_draft(FacetKind::Contact)? {
            Some(FacetDraft::Contact(draft)) => Some(draft),
            _ => None,
        })
    }

    fn address_draft(&self) -> StoreResult<Option<AddressDraft>> {
        Ok(match self.get_draft(FacetKind::Address)? {
            Some(FacetDraft::Address(draft)) => Some(draft),
            _ => None,
        })
    }

    fn time_draft(&self) -> StoreResult<Option<TimeDraft>> {
        Ok(match self.get_draft(FacetKind::Time)? {
            Some(FacetDraft::Time(draft)) => Some(draft),
            _ => None,
        })
    }

    fn note_draft(&self) -> StoreResult<Option<NoteDraft>> {
        Ok(match self.get_draft(FacetKind::Notes)? {
            Some(FacetDraft::Notes(draft)) => Some(draft),
            _ => None,
        })
    }
}

pub trait DraftWriter {
    /// Stores `draft` under its kind, replacing any previous value.
    fn put_draft(&self, draft: &FacetDraft) -> StoreResult<()>;
}

/// Which facet dialog, if any, is currently open.
pub trait DialogSlot {
    fn open_dialog(&self) -> StoreResult<Option<FacetKind>>;
    fn set_open_dialog(&self, kind: Option<FacetKind>) -> StoreResult<()>;
}

pub trait PaymentSlot {
    fn payment_method(&self) -> StoreResult<Option<PaymentMethod>>;
    fn set_payment_method(&self, method: PaymentMethod) -> StoreResult<()>;
}

/// Set while a contact or address change has not reached the backend.
pub trait SaveSlot {
    fn save_pending(&self) -> StoreResult<bool>;
    fn set_save_pending(&self, pending: bool) -> StoreResult<()>;
}

/// `tid`/`ssid` identifiers reused by later remote calls.
pub trait IdentifierSlot {
    fn transport_ids(&self) -> StoreResult<TransportIds>;
    fn remember_transport_ids(&self, ids: &TransportIds) -> StoreResult<()>;
}

/// Everything the checkout routes need from the session.
pub trait CheckoutStore:
    DraftReader + DraftWriter + DialogSlot + PaymentSlot + SaveSlot + IdentifierSlot
{
}

impl<T> CheckoutStore for T where
    T: DraftReader + DraftWriter + DialogSlot + PaymentSlot + SaveSlot + IdentifierSlot + ?Sized
{
}
