//! Reference data behind the edit form pickers.
//!
//! Loaded once when a form opens and independently of form population. Each list is fetched on
//! its own: a failing query empties that list and is reported, the others still arrive.
//! Neighborhoods depend on the selected city and are fetched per city via
//! [`neighborhoods_for_city`].

use serde::Serialize;
use tracing::instrument;

use crate::db::{
    backend::Backend,
    errors::Result,
    handlers::{ActiveFilter, ContactFilter, NeighborhoodFilter},
    models::{
        cells::CellDBResponse,
        contacts::ContactDBResponse,
        locations::{CityDBResponse, NeighborhoodDBResponse},
        ministries::MinistryDBResponse,
        pipeline_stages::PipelineStageDBResponse,
        profiles::ProfileDBResponse,
    },
};
use crate::workflow::{
    notify::{Notification, Notifier},
    selection::{SelectField, Selection},
};

/// One entry of a picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerOption {
    pub value: String,
    pub label: String,
}

impl PickerOption {
    fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    fn none(field: SelectField) -> Self {
        Self::new(field.sentinel(), "None")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    /// Active profiles, ordered by name
    pub profiles: Vec<ProfileDBResponse>,
    /// Active stages, ordered by position
    pub pipeline_stages: Vec<PipelineStageDBResponse>,
    pub cells: Vec<CellDBResponse>,
    pub cities: Vec<CityDBResponse>,
    pub ministries: Vec<MinistryDBResponse>,
    /// Every contact, active or not, as referral candidates
    pub contacts: Vec<ContactDBResponse>,
    /// Lists whose query failed and were left empty
    pub unavailable: Vec<&'static str>,
}

impl ReferenceData {
    /// Fetch every list concurrently. Failures are reported through `notifier` per list.
    #[instrument(skip_all)]
    pub async fn load(backend: &dyn Backend, notifier: &dyn Notifier) -> Self {
        let active = ActiveFilter::active();
        let all_contacts = ContactFilter::default();
        let (profiles, pipeline_stages, cells, cities, contacts, ministries) = tokio::join!(
            backend.list_profiles(&active),
            backend.list_pipeline_stages(&active),
            backend.list_cells(&active),
            backend.list_cities(&active),
            backend.list_contacts(&all_contacts),
            backend.list_ministries(&active),
        );

        let mut unavailable = Vec::new();
        let profiles = settle("profiles", profiles, &mut unavailable, notifier);
        let pipeline_stages = settle("pipeline stages", pipeline_stages, &mut unavailable, notifier);
        let cells = settle("cells", cells, &mut unavailable, notifier);
        let cities = settle("cities", cities, &mut unavailable, notifier);
        let contacts = settle("contacts", contacts, &mut unavailable, notifier);
        let ministries = settle("ministries", ministries, &mut unavailable, notifier);

        Self {
            profiles,
            pipeline_stages,
            cells,
            cities,
            ministries,
            contacts,
            unavailable,
        }
    }

    pub fn city_options(&self) -> Vec<PickerOption> {
        with_none(SelectField::City, self.cities.iter().map(|c| PickerOption::new(c.id.to_string(), &c.name)))
    }

    pub fn cell_options(&self) -> Vec<PickerOption> {
        with_none(SelectField::Cell, self.cells.iter().map(|c| PickerOption::new(c.id.to_string(), &c.name)))
    }

    pub fn ministry_options(&self) -> Vec<PickerOption> {
        with_none(
            SelectField::Ministry,
            self.ministries.iter().map(|m| PickerOption::new(m.id.to_string(), &m.name)),
        )
    }

    pub fn pipeline_stage_options(&self) -> Vec<PickerOption> {
        with_none(
            SelectField::PipelineStage,
            self.pipeline_stages.iter().map(|s| PickerOption::new(s.id.to_string(), &s.name)),
        )
    }

    /// Leader candidates, labelled with their role
    pub fn leader_options(&self) -> Vec<PickerOption> {
        with_none(
            SelectField::Leader,
            self.profiles
                .iter()
                .map(|p| PickerOption::new(p.id.to_string(), format!("{} ({})", p.name, p.role))),
        )
    }

    /// Referrers can be other contacts or staff profiles. A contact never refers itself.
    pub fn referral_options(&self, editing: Option<uuid::Uuid>) -> Vec<PickerOption> {
        let contacts = self
            .contacts
            .iter()
            .filter(|c| Some(c.id) != editing)
            .map(|c| PickerOption::new(c.id.to_string(), &c.name));
        let profiles = self
            .profiles
            .iter()
            .map(|p| PickerOption::new(p.id.to_string(), format!("{} (Leader)", p.name)));
        with_none(SelectField::ReferredBy, contacts.chain(profiles))
    }
}

fn settle<T>(
    list: &'static str,
    result: Result<Vec<T>>,
    unavailable: &mut Vec<&'static str>,
    notifier: &dyn Notifier,
) -> Vec<T> {
    result.unwrap_or_else(|err| {
        tracing::warn!(list, error = %err, "Reference list unavailable");
        notifier.notify(Notification::error(format!("Failed to fetch {list}")));
        unavailable.push(list);
        Vec::new()
    })
}

fn with_none(field: SelectField, options: impl Iterator<Item = PickerOption>) -> Vec<PickerOption> {
    std::iter::once(PickerOption::none(field)).chain(options).collect()
}

/// Active neighborhoods of the selected city. No query is made until a city is chosen.
#[instrument(skip(backend), err)]
pub async fn neighborhoods_for_city(backend: &dyn Backend, raw_city: &str) -> Result<Vec<NeighborhoodDBResponse>> {
    let city_id = match SelectField::City.parse(raw_city) {
        Ok(Selection::Selected(id)) => id,
        // Unknown or garbage values have no neighborhoods either
        Ok(Selection::Unselected) | Err(_) => return Ok(Vec::new()),
    };
    backend.list_neighborhoods(&NeighborhoodFilter::active_in_city(city_id)).await
}

/// Neighborhood picker entries. Values are names, matching how contacts store them.
pub fn neighborhood_options(neighborhoods: &[NeighborhoodDBResponse]) -> Vec<PickerOption> {
    with_none(
        SelectField::Neighborhood,
        neighborhoods.iter().map(|n| PickerOption::new(&n.name, &n.name)),
    )
}
