//! Order-detail synchronizer.
//!
//! Owns the displayed contact, address, time and note values of one checkout
//! page. Seeding runs once: session drafts win, server data is replayed
//! through the dialog handlers otherwise. Confirming a dialog commits locally
//! first; the remote save is a separate step ([`reconcile`]) that runs only
//! when a persisted facet changed, or when an earlier save failed.

use crate::domain::customer::{CreateCustomer, CustomerAddress, CustomerDetails, TransportIds};
use crate::domain::facet::{
    AddressDraft, ContactDraft, FacetDraft, FacetKind, FacetPayload, NoteDraft, TimeDraft,
};
use crate::domain::types::{PhoneNumber, ValidationError};
use crate::gateway::CustomerWriter;
use crate::services::handlers;
use crate::services::{CheckoutContext, ServiceError, ServiceResult};
use crate::store::{DialogSlot, DraftReader, DraftWriter, SaveSlot};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncPhase {
    #[default]
    Uninitialized,
    Seeding,
    Ready,
}

/// Result of a local commit.
#[derive(Clone, Debug, PartialEq)]
pub struct Commit {
    pub kind: FacetKind,
    /// Whether the canonical value differed from the displayed one.
    pub changed: bool,
    /// Composite to persist remotely, if any.
    pub save: Option<CreateCustomer>,
}

#[derive(Clone, Debug)]
pub struct OrderDetails {
    context: CheckoutContext,
    contact: ContactDraft,
    address: AddressDraft,
    time: TimeDraft,
    notes: NoteDraft,
    dialog: Option<FacetKind>,
    phase: SyncPhase,
    seeded: bool,
    save_pending: bool,
}

impl OrderDetails {
    pub fn new(context: CheckoutContext) -> Self {
        let address = if context.is_pickup() {
            context.pickup_address.clone()
        } else {
            AddressDraft::default()
        };
        Self {
            context,
            contact: ContactDraft::default(),
            address,
            time: TimeDraft::default(),
            notes: NoteDraft::default(),
            dialog: None,
            phase: SyncPhase::Uninitialized,
            seeded: false,
            save_pending: false,
        }
    }

    /// Rebuilds the displayed state of an already seeded page from the
    /// session alone. Used when handling form posts.
    pub fn restore<S>(context: CheckoutContext, store: &S) -> ServiceResult<Self>
    where
        S: DraftReader + DialogSlot + SaveSlot + ?Sized,
    {
        let mut details = Self::new(context);
        details.seeded = true;
        details.save_pending = store.save_pending()?;
        if let Some(contact) = store.contact_draft()? {
            details.contact = contact;
        }
        if !details.context.is_pickup() {
            if let Some(address) = store.address_draft()? {
                details.address = address;
            }
        }
        details.adopt_optional_drafts(store)?;
        details.adopt_dialog(store)?;
        details.refresh_phase();
        Ok(details)
    }

    /// Takes over the dialog left open in the session, if it is editable.
    pub fn adopt_dialog<S>(&mut self, store: &S) -> ServiceResult<()>
    where
        S: DialogSlot + ?Sized,
    {
        let dialog = store.open_dialog()?;
        self.dialog = dialog.filter(|kind| self.is_editable(*kind));
        Ok(())
    }

    pub fn context(&self) -> &CheckoutContext {
        &self.context
    }

    pub fn contact(&self) -> &ContactDraft {
        &self.contact
    }

    pub fn address(&self) -> &AddressDraft {
        &self.address
    }

    pub fn time(&self) -> &TimeDraft {
        &self.time
    }

    pub fn notes(&self) -> &NoteDraft {
        &self.notes
    }

    pub fn dialog(&self) -> Option<FacetKind> {
        self.dialog
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == SyncPhase::Ready
    }

    pub fn display_address(&self) -> String {
        self.address.display(&self.context.country)
    }

    /// Whether `kind` can be edited for the current order type.
    pub fn is_editable(&self, kind: FacetKind) -> bool {
        match kind {
            FacetKind::Contact | FacetKind::Time => true,
            FacetKind::Address | FacetKind::Notes => !self.context.is_pickup(),
        }
    }

    /// Arms the one-shot seeding latch. Returns `false` if seeding already ran.
    pub fn begin_seeding(&mut self) -> bool {
        if self.seeded {
            return false;
        }
        self.seeded = true;
        self.phase = SyncPhase::Seeding;
        true
    }

    /// Seeds the displayed state once from the session, falling back to the
    /// customer details the page already fetched (`None` when the lookup
    /// failed or found nothing).
    pub fn seed<S>(&mut self, store: &S, server: Option<&CustomerDetails>) -> ServiceResult<()>
    where
        S: DraftReader + DraftWriter + ?Sized,
    {
        if !self.begin_seeding() {
            log::debug!("Order details already seeded");
            return Ok(());
        }
        self.finish_seeding(store, server)
    }

    /// Second half of seeding, once the remote lookup has resolved.
    pub fn finish_seeding<S>(&mut self, store: &S, server: Option<&CustomerDetails>) -> ServiceResult<()>
    where
        S: DraftReader + DraftWriter + ?Sized,
    {
        if let Some(contact) = store.contact_draft()? {
            self.contact = contact;
        } else if let Some(details) = server {
            let payload = FacetPayload::Contact(ContactDraft {
                name: details.name.clone(),
                phone_number: format!("+{}-{}", self.context.calling_code, details.phone_number),
            });
            if let Some(FacetDraft::Contact(contact)) = self.replay(store, payload)? {
                self.contact = contact;
            }
        }

        if !self.context.is_pickup() {
            if let Some(address) = store.address_draft()? {
                self.address = address;
            } else if let Some(details) = server {
                let address = details
                    .address
                    .as_ref()
                    .map(AddressDraft::from)
                    .unwrap_or_default();
                if let Some(FacetDraft::Address(address)) =
                    self.replay(store, FacetPayload::Address(address))?
                {
                    self.address = address;
                }
            }
        }

        self.adopt_optional_drafts(store)?;
        self.refresh_phase();
        log::debug!("Order details seeded, phase {:?}", self.phase);
        Ok(())
    }

    /// Runs server data through the handlers without a save. Server data
    /// that does not validate leaves the facet empty.
    fn replay<S>(&self, store: &S, payload: FacetPayload) -> ServiceResult<Option<FacetDraft>>
    where
        S: DraftWriter + ?Sized,
    {
        let kind = payload.kind();
        match handlers::handle(store, self.context.calling_code, payload) {
            Ok(draft) => Ok(Some(draft)),
            Err(ServiceError::Validation(err)) => {
                log::warn!("Skipping server seed for {kind}: {err}");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn adopt_optional_drafts<S>(&mut self, store: &S) -> ServiceResult<()>
    where
        S: DraftReader + ?Sized,
    {
        if let Some(time) = store.time_draft()? {
            self.time = time;
        }
        if let Some(notes) = store.note_draft()? {
            self.notes = notes;
        }
        Ok(())
    }

    fn refresh_phase(&mut self) {
        self.phase = if self.contact.is_complete() && self.address.is_complete() {
            SyncPhase::Ready
        } else if self.seeded {
            SyncPhase::Seeding
        } else {
            SyncPhase::Uninitialized
        };
    }

    /// Opens the dialog for `kind`, replacing any other open dialog.
    pub fn open_dialog<S>(&mut self, store: &S, kind: FacetKind) -> ServiceResult<()>
    where
        S: DialogSlot + ?Sized,
    {
        if !self.is_editable(kind) {
            return Err(ServiceError::FacetUnavailable(kind));
        }
        store.set_open_dialog(Some(kind))?;
        self.dialog = Some(kind);
        Ok(())
    }

    pub fn close_dialog<S>(&mut self, store: &S) -> ServiceResult<()>
    where
        S: DialogSlot + ?Sized,
    {
        store.set_open_dialog(None)?;
        self.dialog = None;
        Ok(())
    }

    /// Commits a confirmed dialog payload locally.
    ///
    /// The dialog closes before the handler runs; a rejected payload
    /// re-opens it and leaves the displayed state untouched.
    pub fn confirm<S>(&mut self, store: &S, payload: FacetPayload) -> ServiceResult<Commit>
    where
        S: DraftWriter + DialogSlot + ?Sized,
    {
        let kind = payload.kind();
        if self.dialog != Some(kind) {
            return Err(ServiceError::DialogNotOpen(kind));
        }
        if !self.is_editable(kind) {
            return Err(ServiceError::FacetUnavailable(kind));
        }

        self.close_dialog(store)?;

        let draft = match handlers::handle(store, self.context.calling_code, payload) {
            Ok(draft) => draft,
            Err(err) => {
                self.open_dialog(store, kind)?;
                return Err(err);
            }
        };

        let changed = match draft {
            FacetDraft::Contact(contact) => replace(&mut self.contact, contact),
            FacetDraft::Address(address) => replace(&mut self.address, address),
            FacetDraft::Time(time) => replace(&mut self.time, time),
            FacetDraft::Notes(notes) => replace(&mut self.notes, notes),
        };
        self.refresh_phase();

        let save = if kind.is_persisted() && (changed || self.save_pending) {
            if self.is_ready() {
                Some(self.customer_payload()?)
            } else {
                log::info!("Deferring save of {kind}: order details incomplete");
                None
            }
        } else {
            None
        };

        Ok(Commit { kind, changed, save })
    }

    /// Composite customer payload from the current displayed state.
    pub fn customer_payload(&self) -> ServiceResult<CreateCustomer> {
        let phone = PhoneNumber::from_dialed(&self.contact.phone_number, self.context.calling_code)
            .map_err(|e| ValidationError::from_constraint("phoneNumber", e))?;
        Ok(CreateCustomer {
            customer: CustomerDetails {
                name: self.contact.name.clone(),
                phone_number: phone.into_inner(),
                address: Some(CustomerAddress::from_draft(&self.address, &self.context.country)),
            },
            order_type: self.context.order_type,
        })
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    let changed = *slot != value;
    *slot = value;
    changed
}

/// Pushes a commit's save to the backend. Commits without a save are a no-op.
///
/// A failed save is remembered in the store so the next contact or address
/// confirmation retries it even when nothing changed.
pub async fn reconcile<S, G>(
    store: &S,
    gateway: &G,
    ids: &TransportIds,
    commit: &Commit,
) -> ServiceResult<()>
where
    S: SaveSlot + ?Sized,
    G: CustomerWriter + ?Sized,
{
    let Some(payload) = &commit.save else {
        return Ok(());
    };
    match gateway.save_address(payload, ids).await {
        Ok(()) => {
            store.set_save_pending(false)?;
            Ok(())
        }
        Err(err) => {
            log::error!("Failed to save customer after {} edit: {err}", commit.kind);
            store.set_save_pending(true)?;
            Err(ServiceError::from(err))
        }
    }
}
