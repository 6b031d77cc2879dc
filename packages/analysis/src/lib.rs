#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analysis orchestrator.
//!
//! Runs one catchment analysis end to end: validate the request, geocode
//! the address, fetch the isochrone, aggregate the population grid,
//! estimate households, and assemble the result. Geocoding and isochrone
//! fetching go through injected ports so the pipeline is testable against
//! fixtures; aggregation and estimation never fail (they degrade to
//! zero-valued results).

pub mod country;

use std::sync::Arc;

use async_trait::async_trait;
use geo::{BoundingRect, Polygon};
use pop_map_analysis_models::{AnalysisRequest, AnalysisResult, Coordinates, TravelProfile};
use pop_map_grid::PopulationGrid;
use pop_map_households::HouseholdEstimator;
use pop_map_households_models::BoundingBox;
use pop_map_ors::OrsClient;
use thiserror::Error;

pub use country::{CountryResolver, DEFAULT_COUNTRY, KeywordCountryResolver};

/// Shortest accepted travel-time budget in minutes.
pub const MIN_TIME_MINUTES: u32 = 1;
/// Longest accepted travel-time budget in minutes.
pub const MAX_TIME_MINUTES: u32 = 60;
/// Longest accepted address, in characters.
pub const MAX_ADDRESS_LEN: usize = 200;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A request rejected before any external call.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The address was empty or whitespace.
    #[error("address must not be empty")]
    EmptyAddress,

    /// The address exceeded [`MAX_ADDRESS_LEN`] characters.
    #[error("address exceeds {MAX_ADDRESS_LEN} characters")]
    AddressTooLong,

    /// The travel-time budget fell outside the accepted range.
    #[error("timeMinutes must be between {MIN_TIME_MINUTES} and {MAX_TIME_MINUTES}")]
    TimeOutOfRange,
}

/// Errors terminating an analysis request.
///
/// Each failing stage has its own variant so callers can distinguish an
/// unresolvable address from an uncomputable catchment.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The request failed validation; nothing was called.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The geocoder knows no match for the address.
    #[error("address could not be resolved")]
    AddressNotFound,

    /// The geocoder call itself failed or timed out.
    #[error("geocoding failed: {0}")]
    GeocodeFailed(#[source] BoxError),

    /// The isochrone provider returned no catchment for the location.
    #[error("catchment could not be computed")]
    CatchmentUnavailable,

    /// The isochrone call itself failed or timed out.
    #[error("isochrone request failed: {0}")]
    IsochroneFailed(#[source] BoxError),
}

/// Port for the external geocoder.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves an address to coordinates; `None` when unknown.
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, BoxError>;
}

/// Port for the external isochrone provider.
#[async_trait]
pub trait IsochroneProvider: Send + Sync {
    /// Computes the catchment polygon around `origin`; `None` when the
    /// provider has no coverage there.
    async fn isochrone(
        &self,
        origin: Coordinates,
        minutes: u32,
        profile: TravelProfile,
    ) -> Result<Option<Polygon<f64>>, BoxError>;
}

#[async_trait]
impl Geocoder for OrsClient {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>, BoxError> {
        let point = OrsClient::geocode(self, address).await?;
        Ok(point.map(|p| Coordinates {
            longitude: p.longitude,
            latitude: p.latitude,
        }))
    }
}

#[async_trait]
impl IsochroneProvider for OrsClient {
    async fn isochrone(
        &self,
        origin: Coordinates,
        minutes: u32,
        profile: TravelProfile,
    ) -> Result<Option<Polygon<f64>>, BoxError> {
        Ok(
            OrsClient::isochrone(self, origin.longitude, origin.latitude, minutes, profile.as_ref())
                .await?,
        )
    }
}

/// The analysis pipeline with its shared datasets and collaborators.
///
/// Holds only immutable state; one instance serves concurrent requests.
pub struct Analyzer {
    grid: Arc<PopulationGrid>,
    estimator: HouseholdEstimator,
    geocoder: Box<dyn Geocoder>,
    isochrones: Box<dyn IsochroneProvider>,
    countries: Box<dyn CountryResolver>,
}

impl Analyzer {
    /// Creates an analyzer with the default keyword country resolver.
    #[must_use]
    pub fn new(
        grid: Arc<PopulationGrid>,
        estimator: HouseholdEstimator,
        geocoder: Box<dyn Geocoder>,
        isochrones: Box<dyn IsochroneProvider>,
    ) -> Self {
        Self {
            grid,
            estimator,
            geocoder,
            isochrones,
            countries: Box::new(KeywordCountryResolver),
        }
    }

    /// Replaces the country inference strategy.
    #[must_use]
    pub fn with_country_resolver(mut self, countries: Box<dyn CountryResolver>) -> Self {
        self.countries = countries;
        self
    }

    /// The shared population grid (for dataset statistics).
    #[must_use]
    pub fn grid(&self) -> &PopulationGrid {
        &self.grid
    }

    /// Runs one analysis request through the full pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when validation fails or when the
    /// geocoder or isochrone provider fails; once a catchment exists the
    /// remaining stages always produce a result.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        validate(request)?;

        log::info!(
            "Analyzing {:?} ({} min, {})",
            request.address,
            request.time_minutes,
            request.profile
        );

        let origin = self
            .geocoder
            .geocode(&request.address)
            .await
            .map_err(AnalysisError::GeocodeFailed)?
            .ok_or(AnalysisError::AddressNotFound)?;

        log::debug!(
            "Resolved {:?} to ({:.6}, {:.6})",
            request.address,
            origin.latitude,
            origin.longitude
        );

        let catchment = self
            .isochrones
            .isochrone(origin, request.time_minutes, request.profile)
            .await
            .map_err(AnalysisError::IsochroneFailed)?
            .ok_or(AnalysisError::CatchmentUnavailable)?;

        let population = self.grid.aggregate(&catchment);
        let country_code = self.countries.resolve(&request.address);

        let bbox = bounding_box(&catchment);
        let households = self
            .estimator
            .estimate(population.total_population, &country_code, bbox.as_ref())
            .await;

        #[allow(clippy::cast_precision_loss)]
        let household_density_per_km2 = if population.area_km2 > 0.0 {
            households.total_households as f64 / population.area_km2
        } else {
            0.0
        };

        log::info!(
            "Analysis of {:?} done: {} inhabitants, {} households over {} cells",
            request.address,
            population.total_population,
            households.total_households,
            population.cell_count
        );

        Ok(AnalysisResult {
            address: request.address.clone(),
            coordinates: origin,
            time_minutes: request.time_minutes,
            profile: request.profile,
            country_code,
            population,
            households,
            household_density_per_km2,
        })
    }
}

/// Rejects malformed requests before any external call is made.
fn validate(request: &AnalysisRequest) -> Result<(), ValidationError> {
    if request.address.trim().is_empty() {
        return Err(ValidationError::EmptyAddress);
    }
    if request.address.chars().count() > MAX_ADDRESS_LEN {
        return Err(ValidationError::AddressTooLong);
    }
    if !(MIN_TIME_MINUTES..=MAX_TIME_MINUTES).contains(&request.time_minutes) {
        return Err(ValidationError::TimeOutOfRange);
    }
    Ok(())
}

/// The WGS84 bounding rectangle of a catchment, for footprint lookups.
fn bounding_box(catchment: &Polygon<f64>) -> Option<BoundingBox> {
    catchment.bounding_rect().map(|rect| {
        BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    })
}
