//! Cookie-session backed store.
//!
//! Each facet draft lives under its own key (`contact`, `address`, `time`,
//! `notes`) as JSON. Values that no longer deserialize are treated as absent.

use actix_session::Session;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::customer::TransportIds;
use crate::domain::facet::{FacetDraft, FacetKind};
use crate::domain::order::PaymentMethod;
use crate::store::errors::StoreResult;
use crate::store::{DialogSlot, DraftReader, DraftWriter, IdentifierSlot, PaymentSlot, SaveSlot};

pub const DIALOG_KEY: &str = "dialog";
pub const PAYMENT_METHOD_KEY: &str = "selectedPaymentMethod";
pub const SAVE_PENDING_KEY: &str = "savePending";
pub const TID_KEY: &str = "tid";
pub const SSID_KEY: &str = "ssid";

pub struct CheckoutSession {
    session: Session,
}

impl CheckoutSession {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.session.get::<T>(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Ignoring malformed session value under `{key}`: {err}");
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> StoreResult<()> {
        self.session.insert(key, value)?;
        Ok(())
    }
}

impl DraftReader for CheckoutSession {
    fn get_draft(&self, kind: FacetKind) -> StoreResult<Option<FacetDraft>> {
        let key = kind.as_str();
        Ok(match kind {
            FacetKind::Contact => self.read(key).map(FacetDraft::Contact),
            FacetKind::Address => self.read(key).map(FacetDraft::Address),
            FacetKind::Time => self.read(key).map(FacetDraft::Time),
            FacetKind::Notes => self.read(key).map(FacetDraft::Notes),
        })
    }
}

impl DraftWriter for CheckoutSession {
    fn put_draft(&self, draft: &FacetDraft) -> StoreResult<()> {
        let key = draft.kind().as_str();
        match draft {
            FacetDraft::Contact(value) => self.write(key, value),
            FacetDraft::Address(value) => self.write(key, value),
            FacetDraft::Time(value) => self.write(key, value),
            FacetDraft::Notes(value) => self.write(key, value),
        }
    }
}

impl DialogSlot for CheckoutSession {
    fn open_dialog(&self) -> StoreResult<Option<FacetKind>> {
        Ok(self.read(DIALOG_KEY))
    }

    fn set_open_dialog(&self, kind: Option<FacetKind>) -> StoreResult<()> {
        match kind {
            Some(kind) => self.write(DIALOG_KEY, &kind),
            None => {
                self.session.remove(DIALOG_KEY);
                Ok(())
            }
        }
    }
}

impl PaymentSlot for CheckoutSession {
    fn payment_method(&self) -> StoreResult<Option<PaymentMethod>> {
        Ok(self
            .read::<String>(PAYMENT_METHOD_KEY)
            .and_then(|id| PaymentMethod::from_id(&id)))
    }

    fn set_payment_method(&self, method: PaymentMethod) -> StoreResult<()> {
        self.write(PAYMENT_METHOD_KEY, &method.id())
    }
}

impl SaveSlot for CheckoutSession {
    fn save_pending(&self) -> StoreResult<bool> {
        Ok(self.read(SAVE_PENDING_KEY).unwrap_or(false))
    }

    fn set_save_pending(&self, pending: bool) -> StoreResult<()> {
        if pending {
            self.write(SAVE_PENDING_KEY, &true)
        } else {
            self.session.remove(SAVE_PENDING_KEY);
            Ok(())
        }
    }
}

impl IdentifierSlot for CheckoutSession {
    fn transport_ids(&self) -> StoreResult<TransportIds> {
        Ok(TransportIds {
            device_id: self.read(SSID_KEY),
            tid: self.read(TID_KEY),
        })
    }

    fn remember_transport_ids(&self, ids: &TransportIds) -> StoreResult<()> {
        if let Some((device_id, tid)) = ids.pair() {
            self.write(TID_KEY, &tid)?;
            self.write(SSID_KEY, &device_id)?;
        }
        Ok(())
    }
}
