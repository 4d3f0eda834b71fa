//! Lamp records and the cached session collections.

use geojson::{Feature, FeatureCollection, JsonValue};

use crate::{DateAxis, DomainError, IsoDate, LampId, Stats};

/// A single street-lamp point feature.
///
/// Wraps the original GeoJSON feature (republished verbatim to map sources)
/// and extracts the properties the filter needs into typed fields.
#[derive(Debug, Clone)]
pub struct Lamp {
    id: LampId,
    user: Option<String>,
    date_added: Option<IsoDate>,
    feature: Feature,
}

impl Lamp {
    /// Build a lamp from a pipeline-produced GeoJSON feature.
    ///
    /// Requires a numeric `osm_id` property; `user` and `date_added` are
    /// optional (baseline features carry neither).
    pub fn from_feature(feature: Feature) -> Result<Self, DomainError> {
        let props = feature
            .properties
            .as_ref()
            .ok_or_else(|| DomainError::feature("feature has no properties"))?;

        let id = props
            .get("osm_id")
            .and_then(JsonValue::as_i64)
            .map(LampId::new)
            .ok_or_else(|| DomainError::feature("feature has no numeric osm_id"))?;

        let user = props
            .get("user")
            .and_then(JsonValue::as_str)
            .map(str::to_owned);

        let date_added = props
            .get("date_added")
            .and_then(JsonValue::as_str)
            .map(IsoDate::new);

        Ok(Self {
            id,
            user,
            date_added,
            feature,
        })
    }

    pub fn id(&self) -> LampId {
        self.id
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn date_added(&self) -> Option<&IsoDate> {
        self.date_added.as_ref()
    }

    /// The date this lamp becomes visible on the timeline: `date_added`, or
    /// the baseline date for lamps that predate per-day tracking.
    pub fn effective_date<'a>(&'a self, baseline_date: &'a IsoDate) -> &'a IsoDate {
        self.date_added.as_ref().unwrap_or(baseline_date)
    }

    pub fn feature(&self) -> &Feature {
        &self.feature
    }
}

/// The session caches: both fixed lamp collections plus summary stats.
///
/// Fetched once at startup and never mutated afterwards. All derived state
/// (filtered subsets, counts, the date axis) is computed from here.
#[derive(Debug, Clone)]
pub struct LampData {
    stats: Stats,
    baseline: Vec<Lamp>,
    new: Vec<Lamp>,
    baseline_date: IsoDate,
}

impl LampData {
    pub fn new(stats: Stats, baseline: Vec<Lamp>, new: Vec<Lamp>, baseline_date: IsoDate) -> Self {
        Self {
            stats,
            baseline,
            new,
            baseline_date,
        }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn baseline(&self) -> &[Lamp] {
        &self.baseline
    }

    pub fn new_lamps(&self) -> &[Lamp] {
        &self.new
    }

    pub fn baseline_date(&self) -> &IsoDate {
        &self.baseline_date
    }

    /// The subset of `new` lamps visible as of the given date, with derived
    /// counts. Pure: borrows from the caches, never mutates them.
    pub fn filtered_view(&self, as_of: &IsoDate) -> FilteredView<'_> {
        let new_lamps: Vec<&Lamp> = self
            .new
            .iter()
            .filter(|lamp| lamp.effective_date(&self.baseline_date) <= as_of)
            .collect();
        let new_count = new_lamps.len();

        FilteredView {
            new_lamps,
            new_count,
            total: self.baseline.len() + new_count,
        }
    }

    /// Build the date axis over these caches: every new lamp's effective
    /// date, every daily-summary date, plus the baseline anchor.
    pub fn date_axis(&self) -> DateAxis {
        DateAxis::build(
            &self.new,
            self.stats.daily_additions.keys(),
            &self.baseline_date,
        )
    }
}

/// Derived view for one cursor position.
///
/// Ephemeral: rebuilt on every cursor change and discarded after
/// publication.
#[derive(Debug)]
pub struct FilteredView<'a> {
    /// New lamps whose effective date is at or before the cursor date.
    pub new_lamps: Vec<&'a Lamp>,
    /// Count of the subset above.
    pub new_count: usize,
    /// Baseline count plus the subset count.
    pub total: usize,
}

/// Assemble lamps into a GeoJSON feature collection for a map source.
pub fn feature_collection<'a>(lamps: impl IntoIterator<Item = &'a Lamp>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: lamps.into_iter().map(|lamp| lamp.feature().clone()).collect(),
        foreign_members: None,
    }
}
