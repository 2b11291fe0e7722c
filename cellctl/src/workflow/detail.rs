//! Detail views: one parent record plus its dependent rows.
//!
//! A [`DetailView`] loads a record by id and then the rows that reference it, in that order, on a
//! background task. At most one load is outstanding per view: mounting a new id cancels the
//! previous load, and unmounting (or dropping the view) cancels the current one. Cancellation
//! does not abort the queries; it marks their results as ignorable, so a cancelled load never
//! touches the view's state or emits a notification.
//!
//! Every state commit happens while holding the snapshot lock and only after re-checking the
//! load's [`CancellationToken`]. [`DetailView::unmount`] cancels under the same lock, so once it
//! returns no further commit can land.
//!
//! The same two steps back the HTTP detail handlers: [`load_record`], then
//! [`load_children_reported`], which keeps the record when its dependent rows fail to load.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{Instrument, debug, info_span};
use uuid::Uuid;

use crate::db::{
    backend::Backend,
    errors::{DbError, Result as DbResult},
    handlers::ContactFilter,
    models::{cells::CellDBResponse, contacts::ContactDBResponse},
};
use crate::errors::Error;
use crate::workflow::notify::{Notification, Notifier};

#[derive(Debug, Error)]
pub enum DetailError {
    #[error("Missing identifier")]
    MissingIdentifier,

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("Failed to fetch {noun} details: {source}")]
    LookupFailed {
        noun: &'static str,
        #[source]
        source: DbError,
    },

    #[error("Failed to fetch {noun} {children}: {source}")]
    ChildrenFailed {
        noun: &'static str,
        children: &'static str,
        #[source]
        source: DbError,
    },
}

impl DetailError {
    /// Map to an API error for the record with the given id
    pub fn into_api_error(self, id: Uuid) -> Error {
        match self {
            DetailError::MissingIdentifier => Error::BadRequest {
                message: "Missing identifier".to_string(),
            },
            DetailError::NotFound { entity } => Error::NotFound {
                resource: entity.to_string(),
                id: id.to_string(),
            },
            DetailError::LookupFailed { source, .. } | DetailError::ChildrenFailed { source, .. } => Error::Database(source),
        }
    }

    /// The message without the underlying database error, safe to hand to API clients
    pub fn public_message(&self) -> String {
        match self {
            DetailError::MissingIdentifier | DetailError::NotFound { .. } => self.to_string(),
            DetailError::LookupFailed { noun, .. } => format!("Failed to fetch {noun} details"),
            DetailError::ChildrenFailed { noun, children, .. } => format!("Failed to fetch {noun} {children}"),
        }
    }
}

/// A kind of detail page: which record it shows and which rows hang off it.
#[async_trait]
pub trait DetailSource: Send + Sync + 'static {
    type Record: Clone + Send + Sync + 'static;
    type Child: Clone + Send + Sync + 'static;

    /// Capitalized entity name, e.g. "Cell"
    fn entity(&self) -> &'static str;

    /// Lowercase entity name used inside messages
    fn noun(&self) -> &'static str;

    /// Name of the dependent rows, e.g. "members"
    fn children_label(&self) -> &'static str;

    async fn fetch_record(&self, backend: &dyn Backend, id: Uuid) -> DbResult<Option<Self::Record>>;

    async fn fetch_children(&self, backend: &dyn Backend, id: Uuid) -> DbResult<Vec<Self::Child>>;
}

/// A cell and the contacts that belong to it
#[derive(Debug, Clone, Copy, Default)]
pub struct CellDetailSource;

#[async_trait]
impl DetailSource for CellDetailSource {
    type Record = CellDBResponse;
    type Child = ContactDBResponse;

    fn entity(&self) -> &'static str {
        "Cell"
    }

    fn noun(&self) -> &'static str {
        "cell"
    }

    fn children_label(&self) -> &'static str {
        "members"
    }

    async fn fetch_record(&self, backend: &dyn Backend, id: Uuid) -> DbResult<Option<CellDBResponse>> {
        backend.get_cell(id).await
    }

    async fn fetch_children(&self, backend: &dyn Backend, id: Uuid) -> DbResult<Vec<ContactDBResponse>> {
        backend.list_contacts(&ContactFilter::in_cell(id)).await
    }
}

/// A contact and the contacts it referred
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactDetailSource;

#[async_trait]
impl DetailSource for ContactDetailSource {
    type Record = ContactDBResponse;
    type Child = ContactDBResponse;

    fn entity(&self) -> &'static str {
        "Contact"
    }

    fn noun(&self) -> &'static str {
        "contact"
    }

    fn children_label(&self) -> &'static str {
        "referrals"
    }

    async fn fetch_record(&self, backend: &dyn Backend, id: Uuid) -> DbResult<Option<ContactDBResponse>> {
        backend.get_contact(id).await
    }

    async fn fetch_children(&self, backend: &dyn Backend, id: Uuid) -> DbResult<Vec<ContactDBResponse>> {
        backend.list_contacts(&ContactFilter::referred_by(id)).await
    }
}

/// Load the parent record, expecting exactly one row
pub async fn load_record<S: DetailSource>(source: &S, backend: &dyn Backend, id: Uuid) -> Result<S::Record, DetailError> {
    match source.fetch_record(backend, id).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(DetailError::NotFound { entity: source.entity() }),
        Err(source_err) => Err(DetailError::LookupFailed {
            noun: source.noun(),
            source: source_err,
        }),
    }
}

/// Load the rows that reference the parent record
pub async fn load_children<S: DetailSource>(source: &S, backend: &dyn Backend, id: Uuid) -> Result<Vec<S::Child>, DetailError> {
    source
        .fetch_children(backend, id)
        .await
        .map_err(|source_err| DetailError::ChildrenFailed {
            noun: source.noun(),
            children: source.children_label(),
            source: source_err,
        })
}

/// Load the dependent rows of an already loaded record.
///
/// A failure is reported through `notifier` and yields an empty list together with a
/// client-safe message, so the caller can still return the record.
pub async fn load_children_reported<S: DetailSource>(
    source: &S,
    backend: &dyn Backend,
    id: Uuid,
    notifier: &dyn Notifier,
) -> (Vec<S::Child>, Option<String>) {
    match load_children(source, backend, id).await {
        Ok(children) => (children, None),
        Err(err) => {
            notifier.notify(Notification::error(err.to_string()));
            (Vec::new(), Some(err.public_message()))
        }
    }
}

/// Rendered tri-state of a detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPhase {
    Loading,
    NotFound,
    Loaded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailSnapshot<R, C> {
    pub loading: bool,
    pub record: Option<R>,
    pub children: Vec<C>,
}

impl<R, C> Default for DetailSnapshot<R, C> {
    fn default() -> Self {
        Self {
            loading: false,
            record: None,
            children: Vec::new(),
        }
    }
}

impl<R, C> DetailSnapshot<R, C> {
    fn loading() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> DetailPhase {
        if self.loading {
            DetailPhase::Loading
        } else if self.record.is_some() {
            DetailPhase::Loaded
        } else {
            DetailPhase::NotFound
        }
    }
}

type SharedSnapshot<S> = Arc<Mutex<DetailSnapshot<<S as DetailSource>::Record, <S as DetailSource>::Child>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to one in-flight load. Dropping it cancels the load.
struct FetchHandle {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
    _guard: DropGuard,
}

impl FetchHandle {
    fn spawn(token: CancellationToken, task: JoinHandle<()>) -> Self {
        Self {
            _guard: token.clone().drop_guard(),
            token,
            task: Some(task),
        }
    }
}

pub struct DetailView<S: DetailSource> {
    source: Arc<S>,
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    state: SharedSnapshot<S>,
    fetch: Option<FetchHandle>,
}

impl<S: DetailSource> DetailView<S> {
    pub fn new(source: S, backend: Arc<dyn Backend>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            source: Arc::new(source),
            backend,
            notifier,
            state: Arc::new(Mutex::new(DetailSnapshot::loading())),
            fetch: None,
        }
    }

    /// Start loading the record named by `id`, replacing any load in progress.
    ///
    /// Fails fast, without touching state, when no identifier is given.
    pub fn mount(&mut self, id: Option<&str>) -> Result<(), DetailError> {
        let raw_id = match id.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.to_string(),
            _ => return Err(DetailError::MissingIdentifier),
        };

        self.cancel_current();
        *lock(&self.state) = DetailSnapshot::loading();

        let token = CancellationToken::new();
        let span = info_span!("detail_load", entity = self.source.entity(), id = %raw_id);
        let task = tokio::spawn(
            run_load(
                self.source.clone(),
                self.backend.clone(),
                self.notifier.clone(),
                self.state.clone(),
                token.clone(),
                raw_id,
            )
            .instrument(span),
        );
        self.fetch = Some(FetchHandle::spawn(token, task));
        Ok(())
    }

    /// Stop applying results of the current load. Safe to call more than once.
    pub fn unmount(&mut self) {
        self.cancel_current();
    }

    fn cancel_current(&mut self) {
        if let Some(fetch) = self.fetch.take() {
            let _state = lock(&self.state);
            fetch.token.cancel();
        }
    }

    /// Replace the in-memory record with one returned by an edit, without re-fetching.
    pub fn record_updated(&self, record: S::Record) {
        lock(&self.state).record = Some(record);
    }

    pub fn snapshot(&self) -> DetailSnapshot<S::Record, S::Child> {
        lock(&self.state).clone()
    }

    pub fn phase(&self) -> DetailPhase {
        lock(&self.state).phase()
    }

    /// Wait for the current load to finish (or be abandoned)
    pub async fn wait(&mut self) {
        if let Some(task) = self.fetch.as_mut().and_then(|fetch| fetch.task.take())
            && let Err(e) = task.await
        {
            tracing::error!(entity = self.source.entity(), "Detail load task failed: {e}");
        }
    }
}

async fn run_load<S: DetailSource>(
    source: Arc<S>,
    backend: Arc<dyn Backend>,
    notifier: Arc<dyn Notifier>,
    state: SharedSnapshot<S>,
    token: CancellationToken,
    raw_id: String,
) {
    // An id that cannot exist is indistinguishable from one that does not
    let loaded = match Uuid::parse_str(&raw_id) {
        Ok(id) => load_record(source.as_ref(), backend.as_ref(), id).await.map(|record| (id, record)),
        Err(_) => Err(DetailError::NotFound { entity: source.entity() }),
    };

    let id = {
        let mut snapshot = lock(&state);
        if token.is_cancelled() {
            debug!("Detail load cancelled before the record arrived");
            return;
        }
        match loaded {
            Ok((id, record)) => {
                snapshot.record = Some(record);
                id
            }
            Err(err) => {
                snapshot.loading = false;
                notifier.notify(Notification::error(err.to_string()));
                return;
            }
        }
    };

    let children = load_children(source.as_ref(), backend.as_ref(), id).await;

    let mut snapshot = lock(&state);
    if token.is_cancelled() {
        debug!("Detail load cancelled before the children arrived");
        return;
    }
    match children {
        Ok(children) => snapshot.children = children,
        // The parent stays visible; only the list is missing
        Err(err) => notifier.notify(Notification::error(err.to_string())),
    }
    snapshot.loading = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MemoryBackend, RecordingNotifier, sample_cell, sample_contact};
    use crate::api::models::profiles::Role;
    use crate::workflow::edit_contact::EditContactDialog;
    use crate::workflow::notify::Variant;

    fn view<S: DetailSource>(
        source: S,
        backend: &Arc<MemoryBackend>,
        notifier: &Arc<RecordingNotifier>,
    ) -> DetailView<S> {
        DetailView::new(source, backend.clone(), notifier.clone())
    }

    #[tokio::test]
    async fn test_cell_detail_loads_record_then_members() {
        let backend = Arc::new(MemoryBackend::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let cell = backend.insert_cell(sample_cell("Alpha"));
        let mut member = sample_contact("Ana");
        member.cell_id = Some(cell.id);
        let member = backend.insert_contact(member);
        backend.insert_contact(sample_contact("Outsider"));

        let mut view = view(CellDetailSource, &backend, &notifier);
        assert_eq!(view.phase(), DetailPhase::Loading);

        view.mount(Some(&cell.id.to_string())).unwrap();
        view.wait().await;

        let snapshot = view.snapshot();
        assert_eq!(snapshot.phase(), DetailPhase::Loaded);
        assert_eq!(snapshot.record, Some(cell));
        assert_eq!(snapshot.children, vec![member]);
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_missing_identifier_fails_fast() {
        let backend = Arc::new(MemoryBackend::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let mut view = view(CellDetailSource, &backend, &notifier);

        assert!(matches!(view.mount(None), Err(DetailError::MissingIdentifier)));
        assert!(matches!(view.mount(Some("  ")), Err(DetailError::MissingIdentifier)));
        assert_eq!(backend.read_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_cell_notifies_not_found() {
        let backend = Arc::new(MemoryBackend::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let mut view = view(CellDetailSource, &backend, &notifier);

        view.mount(Some(&Uuid::new_v4().to_string())).unwrap();
        view.wait().await;

        assert_eq!(view.phase(), DetailPhase::NotFound);
        let notes = notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Error");
        assert_eq!(notes[0].description, "Cell not found");
        assert_eq!(notes[0].variant, Variant::Destructive);
    }

    #[tokio::test]
    async fn test_malformed_identifier_is_not_found() {
        let backend = Arc::new(MemoryBackend::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let mut view = view(CellDetailSource, &backend, &notifier);

        view.mount(Some("not-a-uuid")).unwrap();
        view.wait().await;

        assert_eq!(view.phase(), DetailPhase::NotFound);
        assert_eq!(notifier.notifications()[0].description, "Cell not found");
    }

    #[tokio::test]
    async fn test_lookup_failure_leaves_state_empty() {
        let backend = Arc::new(MemoryBackend::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let cell = backend.insert_cell(sample_cell("Alpha"));
        backend.fail_reads(true);

        let mut view = view(CellDetailSource, &backend, &notifier);
        view.mount(Some(&cell.id.to_string())).unwrap();
        view.wait().await;

        let snapshot = view.snapshot();
        assert_eq!(snapshot.phase(), DetailPhase::NotFound);
        assert!(snapshot.children.is_empty());
        let description = &notifier.notifications()[0].description;
        assert!(description.starts_with("Failed to fetch cell details: "), "{description}");
    }

    #[tokio::test]
    async fn test_children_failure_keeps_parent() {
        let backend = Arc::new(MemoryBackend::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let cell = backend.insert_cell(sample_cell("Alpha"));
        backend.fail_contact_lists(true);

        let mut view = view(CellDetailSource, &backend, &notifier);
        view.mount(Some(&cell.id.to_string())).unwrap();
        view.wait().await;

        let snapshot = view.snapshot();
        assert_eq!(snapshot.phase(), DetailPhase::Loaded);
        assert_eq!(snapshot.record, Some(cell));
        let description = &notifier.notifications()[0].description;
        assert!(description.starts_with("Failed to fetch cell members: "), "{description}");
    }

    #[tokio::test]
    async fn test_unmount_before_resolution_suppresses_everything() {
        let backend = Arc::new(MemoryBackend::default());
        let notifier = Arc::new(RecordingNotifier::default());
        backend.hold_reads();

        let mut view = view(CellDetailSource, &backend, &notifier);
        // Unknown id: a completed load would emit a not-found notification
        view.mount(Some(&Uuid::new_v4().to_string())).unwrap();
        view.unmount();
        let before = view.snapshot();

        backend.release_reads();
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(view.snapshot(), before);
        assert_eq!(view.phase(), DetailPhase::Loading);
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_remount_discards_previous_load() {
        let backend = Arc::new(MemoryBackend::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let first = backend.insert_cell(sample_cell("First"));
        let second = backend.insert_cell(sample_cell("Second"));
        backend.hold_reads();

        let mut view = view(CellDetailSource, &backend, &notifier);
        view.mount(Some(&first.id.to_string())).unwrap();
        view.mount(Some(&second.id.to_string())).unwrap();

        backend.release_reads();
        view.wait().await;
        // Give the abandoned load a chance to run to completion
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;

        assert_eq!(view.snapshot().record, Some(second));
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_dropping_view_cancels_load() {
        let backend = Arc::new(MemoryBackend::default());
        let notifier = Arc::new(RecordingNotifier::default());
        backend.hold_reads();

        let mut view = view(CellDetailSource, &backend, &notifier);
        view.mount(Some(&Uuid::new_v4().to_string())).unwrap();
        drop(view);

        backend.release_reads();
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_record_updated_replaces_without_refetch() {
        let backend = Arc::new(MemoryBackend::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let contact = backend.insert_contact(sample_contact("Ana"));

        let mut view = view(ContactDetailSource, &backend, &notifier);
        view.mount(Some(&contact.id.to_string())).unwrap();
        view.wait().await;
        let reads = backend.read_count();

        let mut edited = contact.clone();
        edited.name = "Ana Maria".to_string();
        view.record_updated(edited.clone());

        assert_eq!(view.snapshot().record, Some(edited));
        assert_eq!(backend.read_count(), reads);
    }

    #[tokio::test]
    async fn test_submitted_edit_replaces_record_without_refetch() {
        let backend = Arc::new(MemoryBackend::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let mut contact = sample_contact("Ana");
        contact.whatsapp = Some("5511999990000".to_string());
        let contact = backend.insert_contact(contact);

        let mut view = view(ContactDetailSource, &backend, &notifier);
        view.mount(Some(&contact.id.to_string())).unwrap();
        view.wait().await;
        let reads = backend.read_count();

        let loaded = view.snapshot().record.unwrap();
        let mut dialog = EditContactDialog::new(Role::Admin);
        dialog.open(&loaded);
        dialog.set_name("Ana Maria");
        let updated = dialog.submit(backend.as_ref(), notifier.as_ref()).await.unwrap();
        view.record_updated(updated.clone());

        assert_eq!(view.snapshot().record, Some(updated));
        assert_eq!(view.snapshot().record.unwrap().name, "Ana Maria");
        assert_eq!(backend.read_count(), reads);
    }

    /// Fails by panicking inside the load task
    struct PanickingSource;

    #[async_trait]
    impl DetailSource for PanickingSource {
        type Record = CellDBResponse;
        type Child = ContactDBResponse;

        fn entity(&self) -> &'static str {
            "Cell"
        }

        fn noun(&self) -> &'static str {
            "cell"
        }

        fn children_label(&self) -> &'static str {
            "members"
        }

        async fn fetch_record(&self, _backend: &dyn Backend, _id: Uuid) -> DbResult<Option<CellDBResponse>> {
            panic!("lookup exploded")
        }

        async fn fetch_children(&self, _backend: &dyn Backend, _id: Uuid) -> DbResult<Vec<ContactDBResponse>> {
            Ok(Vec::new())
        }
    }

    #[test_log::test(tokio::test)]
    async fn test_panicking_load_is_contained() {
        let backend = Arc::new(MemoryBackend::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let mut view = view(PanickingSource, &backend, &notifier);
        view.mount(Some(&Uuid::new_v4().to_string())).unwrap();
        view.wait().await;

        assert_eq!(view.phase(), DetailPhase::Loading);
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_reported_children_failure_keeps_message_public() {
        let backend = Arc::new(MemoryBackend::default());
        let notifier = RecordingNotifier::default();
        let cell = backend.insert_cell(sample_cell("Alpha"));
        backend.fail_contact_lists(true);

        let (members, error) = load_children_reported(&CellDetailSource, backend.as_ref(), cell.id, &notifier).await;

        assert!(members.is_empty());
        assert_eq!(error.as_deref(), Some("Failed to fetch cell members"));
        let notes = notifier.notifications();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].description.starts_with("Failed to fetch cell members: "));
    }

    #[tokio::test]
    async fn test_contact_detail_lists_referrals() {
        let backend = Arc::new(MemoryBackend::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let referrer = backend.insert_contact(sample_contact("Ana"));
        let mut referred = sample_contact("Bruno");
        referred.referred_by = Some(referrer.id);
        let referred = backend.insert_contact(referred);

        let mut view = view(ContactDetailSource, &backend, &notifier);
        view.mount(Some(&referrer.id.to_string())).unwrap();
        view.wait().await;

        assert_eq!(view.snapshot().children, vec![referred]);
    }
}
