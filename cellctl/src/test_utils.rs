//! Test utilities (available with the `test-utils` feature).
//!
//! [`MemoryBackend`] is an in-process [`Backend`] that records every call, can be told to fail,
//! and can hold reads open so tests can observe a load while it is in flight.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{NaiveTime, Utc};
use tokio::sync::watch;
use uuid::Uuid;

use crate::{
    AppState,
    api::models::{contacts::ContactStatus, profiles::Role},
    config::Config,
    db::{
        backend::Backend,
        errors::{DbError, Result},
        handlers::{ActiveFilter, ContactFilter, NeighborhoodFilter},
        models::{
            cells::{CellDBResponse, CellUpdateDBRequest},
            contacts::{ContactDBResponse, ContactUpdateDBRequest},
            locations::{CityDBResponse, NeighborhoodDBResponse},
            ministries::MinistryDBResponse,
            pipeline_stages::PipelineStageDBResponse,
            profiles::ProfileDBResponse,
        },
    },
    types::{CellId, CityId, ContactId},
    workflow::notify::{Notification, Notifier},
};

/// Header the test config trusts for proxy authentication
pub const TEST_AUTH_HEADER: &str = "x-cellctl-user";

/// A call made against a [`MemoryBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    GetCell(CellId),
    ListCells(ActiveFilter),
    UpdateCell(CellId, CellUpdateDBRequest),
    GetContact(ContactId),
    ListContacts(ContactFilter),
    UpdateContact(ContactId, ContactUpdateDBRequest),
    GetProfileByEmail(String),
    ListProfiles(ActiveFilter),
    ListPipelineStages(ActiveFilter),
    ListCities(ActiveFilter),
    ListNeighborhoods(NeighborhoodFilter),
    ListMinistries(ActiveFilter),
}

impl BackendCall {
    pub fn is_write(&self) -> bool {
        matches!(self, BackendCall::UpdateCell(..) | BackendCall::UpdateContact(..))
    }
}

pub struct MemoryBackend {
    cells: Mutex<Vec<CellDBResponse>>,
    contacts: Mutex<Vec<ContactDBResponse>>,
    profiles: Mutex<Vec<ProfileDBResponse>>,
    pipeline_stages: Mutex<Vec<PipelineStageDBResponse>>,
    cities: Mutex<Vec<CityDBResponse>>,
    neighborhoods: Mutex<Vec<NeighborhoodDBResponse>>,
    ministries: Mutex<Vec<MinistryDBResponse>>,
    calls: Mutex<Vec<BackendCall>>,
    fail_reads: AtomicBool,
    fail_contact_lists: AtomicBool,
    fail_updates: AtomicBool,
    /// `true` while reads are held open
    read_gate: watch::Sender<bool>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self {
            cells: Mutex::default(),
            contacts: Mutex::default(),
            profiles: Mutex::default(),
            pipeline_stages: Mutex::default(),
            cities: Mutex::default(),
            neighborhoods: Mutex::default(),
            ministries: Mutex::default(),
            calls: Mutex::default(),
            fail_reads: AtomicBool::new(false),
            fail_contact_lists: AtomicBool::new(false),
            fail_updates: AtomicBool::new(false),
            read_gate: watch::channel(false).0,
        }
    }
}

fn injected(operation: &str) -> DbError {
    DbError::Other(anyhow::anyhow!("injected failure in {operation}"))
}

impl MemoryBackend {
    pub fn insert_cell(&self, cell: CellDBResponse) -> CellDBResponse {
        self.cells.lock().unwrap().push(cell.clone());
        cell
    }

    pub fn insert_contact(&self, contact: ContactDBResponse) -> ContactDBResponse {
        self.contacts.lock().unwrap().push(contact.clone());
        contact
    }

    pub fn insert_profile(&self, profile: ProfileDBResponse) -> ProfileDBResponse {
        self.profiles.lock().unwrap().push(profile.clone());
        profile
    }

    pub fn insert_pipeline_stage(&self, name: &str, position: i32) -> PipelineStageDBResponse {
        let stage = PipelineStageDBResponse {
            id: Uuid::new_v4(),
            name: name.to_string(),
            position,
            active: true,
        };
        self.pipeline_stages.lock().unwrap().push(stage.clone());
        stage
    }

    pub fn insert_city(&self, name: &str) -> CityDBResponse {
        let city = CityDBResponse {
            id: Uuid::new_v4(),
            name: name.to_string(),
            active: true,
        };
        self.cities.lock().unwrap().push(city.clone());
        city
    }

    pub fn insert_neighborhood(&self, name: &str, city_id: CityId) -> NeighborhoodDBResponse {
        let neighborhood = NeighborhoodDBResponse {
            id: Uuid::new_v4(),
            name: name.to_string(),
            city_id,
            active: true,
        };
        self.neighborhoods.lock().unwrap().push(neighborhood.clone());
        neighborhood
    }

    pub fn insert_ministry(&self, name: &str) -> MinistryDBResponse {
        let ministry = MinistryDBResponse {
            id: Uuid::new_v4(),
            name: name.to_string(),
            active: true,
        };
        self.ministries.lock().unwrap().push(ministry.clone());
        ministry
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn update_calls(&self) -> Vec<BackendCall> {
        self.calls().into_iter().filter(BackendCall::is_write).collect()
    }

    pub fn read_count(&self) -> usize {
        self.calls.lock().unwrap().iter().filter(|call| !call.is_write()).count()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_contact_lists(&self, fail: bool) {
        self.fail_contact_lists.store(fail, Ordering::SeqCst);
    }

    pub fn fail_updates(&self, fail: bool) {
        self.fail_updates.store(fail, Ordering::SeqCst);
    }

    /// Block every read until [`MemoryBackend::release_reads`]
    pub fn hold_reads(&self) {
        self.read_gate.send_replace(true);
    }

    pub fn release_reads(&self) {
        self.read_gate.send_replace(false);
    }

    async fn read(&self, call: BackendCall) -> Result<()> {
        let operation = format!("{call:?}");
        self.calls.lock().unwrap().push(call);

        let mut gate = self.read_gate.subscribe();
        let _ = gate.wait_for(|held| !*held).await;

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected(&operation));
        }
        Ok(())
    }

    fn list_active<T: Clone>(rows: &Mutex<Vec<T>>, filter: &ActiveFilter, active: impl Fn(&T) -> bool) -> Vec<T> {
        rows.lock().unwrap().iter().filter(|row| filter.admits(active(row))).cloned().collect()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get_cell(&self, id: CellId) -> Result<Option<CellDBResponse>> {
        self.read(BackendCall::GetCell(id)).await?;
        Ok(self.cells.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn list_cells(&self, filter: &ActiveFilter) -> Result<Vec<CellDBResponse>> {
        self.read(BackendCall::ListCells(*filter)).await?;
        let mut cells = Self::list_active(&self.cells, filter, |c| c.active);
        cells.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cells)
    }

    async fn update_cell(&self, id: CellId, request: &CellUpdateDBRequest) -> Result<CellDBResponse> {
        self.calls.lock().unwrap().push(BackendCall::UpdateCell(id, request.clone()));
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(injected("update_cell"));
        }

        let mut cells = self.cells.lock().unwrap();
        let cell = cells.iter_mut().find(|c| c.id == id).ok_or(DbError::NotFound)?;
        cell.name = request.name.clone();
        cell.address = request.address.clone();
        cell.meeting_day = request.meeting_day;
        cell.meeting_time = request.meeting_time;
        cell.leader_id = request.leader_id;
        cell.neighborhood_id = request.neighborhood_id;
        cell.active = request.active;
        cell.updated_at = Utc::now();
        Ok(cell.clone())
    }

    async fn get_contact(&self, id: ContactId) -> Result<Option<ContactDBResponse>> {
        self.read(BackendCall::GetContact(id)).await?;
        Ok(self.contacts.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn list_contacts(&self, filter: &ContactFilter) -> Result<Vec<ContactDBResponse>> {
        self.read(BackendCall::ListContacts(filter.clone())).await?;
        if self.fail_contact_lists.load(Ordering::SeqCst) {
            return Err(injected("list_contacts"));
        }
        let mut contacts: Vec<_> = self.contacts.lock().unwrap().iter().filter(|c| filter.admits(c)).cloned().collect();
        contacts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(contacts)
    }

    async fn update_contact(&self, id: ContactId, request: &ContactUpdateDBRequest) -> Result<ContactDBResponse> {
        self.calls.lock().unwrap().push(BackendCall::UpdateContact(id, request.clone()));
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(injected("update_contact"));
        }

        let mut contacts = self.contacts.lock().unwrap();
        let contact = contacts.iter_mut().find(|c| c.id == id).ok_or(DbError::NotFound)?;
        *contact = request.apply_to(id);
        Ok(contact.clone())
    }

    async fn get_profile_by_email(&self, email: &str) -> Result<Option<ProfileDBResponse>> {
        self.read(BackendCall::GetProfileByEmail(email.to_string())).await?;
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_profiles(&self, filter: &ActiveFilter) -> Result<Vec<ProfileDBResponse>> {
        self.read(BackendCall::ListProfiles(*filter)).await?;
        let mut profiles = Self::list_active(&self.profiles, filter, |p| p.active);
        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(profiles)
    }

    async fn list_pipeline_stages(&self, filter: &ActiveFilter) -> Result<Vec<PipelineStageDBResponse>> {
        self.read(BackendCall::ListPipelineStages(*filter)).await?;
        let mut stages = Self::list_active(&self.pipeline_stages, filter, |s| s.active);
        stages.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.name.cmp(&b.name)));
        Ok(stages)
    }

    async fn list_cities(&self, filter: &ActiveFilter) -> Result<Vec<CityDBResponse>> {
        self.read(BackendCall::ListCities(*filter)).await?;
        let mut cities = Self::list_active(&self.cities, filter, |c| c.active);
        cities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cities)
    }

    async fn list_neighborhoods(&self, filter: &NeighborhoodFilter) -> Result<Vec<NeighborhoodDBResponse>> {
        self.read(BackendCall::ListNeighborhoods(*filter)).await?;
        let mut neighborhoods: Vec<_> = self
            .neighborhoods
            .lock()
            .unwrap()
            .iter()
            .filter(|n| filter.admits(n))
            .cloned()
            .collect();
        neighborhoods.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(neighborhoods)
    }

    async fn list_ministries(&self, filter: &ActiveFilter) -> Result<Vec<MinistryDBResponse>> {
        self.read(BackendCall::ListMinistries(*filter)).await?;
        let mut ministries = Self::list_active(&self.ministries, filter, |m| m.active);
        ministries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(ministries)
    }
}

/// Keeps every notification for later inspection
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

pub fn sample_contact(name: &str) -> ContactDBResponse {
    ContactDBResponse {
        id: Uuid::new_v4(),
        name: name.to_string(),
        whatsapp: Some("5511900000000".to_string()),
        status: ContactStatus::Pending,
        encounter_with_god: false,
        baptized: false,
        cell_id: None,
        pipeline_stage_id: None,
        neighborhood: "Centro".to_string(),
        city_id: None,
        ministry_id: None,
        age: None,
        birth_date: None,
        referred_by: None,
        photo_url: None,
        founder: false,
        leader_id: None,
    }
}

/// Active profile whose email is derived from the name, e.g. `paula@church.test`
pub fn sample_profile(name: &str, role: Role) -> ProfileDBResponse {
    ProfileDBResponse {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{}@church.test", name.to_lowercase().replace(' ', ".")),
        role,
        active: true,
    }
}

/// Active cell meeting on Wednesdays at 19:30
pub fn sample_cell(name: &str) -> CellDBResponse {
    let now = Utc::now();
    CellDBResponse {
        id: Uuid::new_v4(),
        name: name.to_string(),
        address: "Rua das Flores, 100".to_string(),
        meeting_day: 3,
        meeting_time: NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
        leader_id: None,
        neighborhood_id: None,
        active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.auth.proxy_header.header_name = TEST_AUTH_HEADER.to_string();
    config.database.pool.max_connections = 1;
    // The Prometheus recorder is process-global; tests that need it enable it explicitly
    config.enable_metrics = false;
    config
}

pub fn create_test_state(backend: Arc<MemoryBackend>) -> AppState {
    AppState::builder().backend(backend).config(create_test_config()).build()
}

/// Full router over an in-memory backend
pub fn create_test_app(backend: Arc<MemoryBackend>) -> TestServer {
    let state = create_test_state(backend);
    let router = crate::build_router(&state).unwrap();
    TestServer::new(router).unwrap()
}
