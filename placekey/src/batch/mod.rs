//! Batch processing over record collections
//!
//! [`BatchProcessor::process`] walks a [`RecordSource`] in fixed-size chunks
//! and applies an operation to every record. A failing record is recorded in
//! the [`BatchSummary`] and processing carries on with the next one.
//!
//! The convenience operations build on it:
//!
//! - [`BatchProcessor::generate_placekeys`]: coordinates to placekeys, locally
//! - [`BatchProcessor::geocode`]: coordinates locally, addresses through the API
//! - [`BatchProcessor::find_nearby`]: records within a distance of a point

mod record;
mod source;


pub use record::{Place, PlaceRecord};
pub use source::{PageStore, Paged, RecordSource, SourceError};

use crate::client::{HttpClient, PlacekeyClient, ReqwestClient};
use crate::codec::{Placekey, PlacekeyCodec, RESOLUTION};
use crate::config::DEFAULT_CHUNK_SIZE;
use crate::grid::GeoPoint;
use crate::log::{Logger, NoOpLogger};
use crate::spatial::{ring_radius, SpatialQuery, MAX_NEARBY_RINGS};
use crate::{log_debug, log_info, log_warn};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Called after each chunk with `(processed, successful)` so far.
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// A record the operation failed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemError {
    /// Position of the record in the source.
    pub index: usize,
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary<V> {
    pub total: usize,
    pub processed: usize,
    pub successful: usize,
    pub errors: Vec<ItemError>,
    /// Successful results as `(index, value)`, in source order.
    pub results: Vec<(usize, V)>,
}

impl<V> BatchSummary<V> {
    fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            successful: 0,
            errors: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn failed(&self) -> usize {
        self.errors.len()
    }

    /// True when every record was processed without error.
    pub fn is_complete(&self) -> bool {
        self.processed == self.total && self.errors.is_empty()
    }
}

impl BatchSummary<Option<f64>> {
    /// Matching records from [`BatchProcessor::find_nearby`] as
    /// `(index, meters)`, nearest first.
    pub fn matches(&self) -> Vec<(usize, f64)> {
        let mut matches: Vec<(usize, f64)> = self
            .results
            .iter()
            .filter_map(|(index, distance)| distance.map(|d| (*index, d)))
            .collect();
        matches.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        matches
    }
}

/// What [`BatchProcessor::geocode`] did with a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeocodeOutcome {
    /// The record already had a placekey.
    Skipped,
    /// Encoded locally from coordinates.
    Encoded(Placekey),
    /// Resolved from the address through the API.
    Resolved(Placekey),
}

impl GeocodeOutcome {
    pub fn placekey(&self) -> Option<&Placekey> {
        match self {
            Self::Skipped => None,
            Self::Encoded(pk) | Self::Resolved(pk) => Some(pk),
        }
    }
}

/// Runs operations over record collections in chunks.
pub struct BatchProcessor<H: HttpClient = ReqwestClient> {
    spatial: SpatialQuery,
    client: Option<Arc<PlacekeyClient<H>>>,
    chunk_size: usize,
    progress: Option<ProgressCallback>,
    logger: Arc<dyn Logger>,
}

impl BatchProcessor<ReqwestClient> {
    /// Creates a processor without an API client. Address records fail in
    /// [`geocode`](Self::geocode) until one is attached.
    pub fn new(codec: Arc<PlacekeyCodec>) -> Self {
        Self {
            spatial: SpatialQuery::new(codec),
            client: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            progress: None,
            logger: Arc::new(NoOpLogger),
        }
    }
}

impl<H: HttpClient> BatchProcessor<H> {
    /// Attaches the client used to resolve addresses.
    pub fn with_client<C: HttpClient>(self, client: Arc<PlacekeyClient<C>>) -> BatchProcessor<C> {
        BatchProcessor {
            spatial: self.spatial,
            client: Some(client),
            chunk_size: self.chunk_size,
            progress: self.progress,
            logger: self.logger,
        }
    }

    /// Records per chunk. Zero is treated as one.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_progress(mut self, callback: impl Fn(usize, usize) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(callback));
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn codec(&self) -> &Arc<PlacekeyCodec> {
        self.spatial.codec()
    }

    /// Applies `op` to every record of `source`.
    ///
    /// Records are handed out `chunk_size` at a time. An `Err` from `op` is
    /// recorded against the record's index. When the source itself fails to
    /// load or save a chunk, every record of that chunk is recorded as
    /// failed.
    pub fn process<S, V, E, F>(&self, source: &mut S, mut op: F) -> BatchSummary<V>
    where
        S: RecordSource + ?Sized,
        E: fmt::Display,
        F: FnMut(&mut S::Item) -> Result<V, E>,
    {
        let total = source.len();
        let mut summary = BatchSummary::new(total);

        let mut start = 0;
        while start < total {
            let end = (start + self.chunk_size).min(total);
            let mut outcomes: Vec<(usize, Result<V, String>)> = Vec::with_capacity(end - start);

            let loaded = source.with_chunk(start..end, &mut |chunk| {
                for (offset, record) in chunk.iter_mut().enumerate() {
                    outcomes.push((start + offset, op(record).map_err(|e| e.to_string())));
                }
            });

            match loaded {
                Ok(()) => {
                    for (index, outcome) in outcomes {
                        summary.processed += 1;
                        match outcome {
                            Ok(value) => {
                                summary.successful += 1;
                                summary.results.push((index, value));
                            }
                            Err(error) => {
                                log_warn!(self.logger, "Record {} failed: {}", index, error);
                                summary.errors.push(ItemError { index, error });
                            }
                        }
                    }
                }
                Err(e) => {
                    log_warn!(self.logger, "{}", e);
                    let error = e.to_string();
                    for index in start..end {
                        summary.processed += 1;
                        summary.errors.push(ItemError {
                            index,
                            error: error.clone(),
                        });
                    }
                }
            }

            log_debug!(
                self.logger,
                "Processed {}/{} records ({} successful)",
                summary.processed,
                total,
                summary.successful
            );
            if let Some(progress) = &self.progress {
                progress(summary.processed, summary.successful);
            }
            start = end;
        }

        log_info!(
            self.logger,
            "Batch finished: {} processed, {} successful, {} failed",
            summary.processed,
            summary.successful,
            summary.failed()
        );
        summary
    }

    /// Sets the placekey of every record from its coordinates.
    ///
    /// Records without coordinates fail. Existing placekeys are replaced.
    pub fn generate_placekeys<S>(&self, source: &mut S) -> BatchSummary<Placekey>
    where
        S: RecordSource + ?Sized,
        S::Item: PlaceRecord,
    {
        let codec = self.spatial.codec();
        self.process(source, |record| -> Result<Placekey, String> {
            let (lat, lng) = record
                .coordinates()
                .ok_or_else(|| "record has no coordinates".to_string())?;
            let placekey = codec.encode(lat, lng).map_err(|e| e.to_string())?;
            record.set_placekey(placekey.to_string());
            Ok(placekey)
        })
    }

    /// Fills in missing placekeys.
    ///
    /// Records that already have one are skipped. Coordinates are encoded
    /// locally; otherwise the address is resolved through the API client.
    pub fn geocode<S>(&self, source: &mut S) -> BatchSummary<GeocodeOutcome>
    where
        S: RecordSource + ?Sized,
        S::Item: PlaceRecord,
    {
        let codec = self.spatial.codec();
        self.process(source, |record| -> Result<GeocodeOutcome, String> {
            if record.placekey().is_some() {
                return Ok(GeocodeOutcome::Skipped);
            }

            if let Some((lat, lng)) = record.coordinates() {
                let placekey = codec.encode(lat, lng).map_err(|e| e.to_string())?;
                record.set_placekey(placekey.to_string());
                return Ok(GeocodeOutcome::Encoded(placekey));
            }

            let query = record
                .address_query()
                .ok_or_else(|| "record has neither coordinates nor an address".to_string())?;
            let client = self
                .client
                .as_ref()
                .ok_or_else(|| "no API client configured for address lookup".to_string())?;

            let result = client.lookup(&query).map_err(|e| e.to_string())?;
            let placekey = placekey_from_result(&result)?;
            record.set_placekey(placekey.to_string());
            Ok(GeocodeOutcome::Resolved(placekey))
        })
    }

    /// Finds the records whose placekey lies within `distance_m` meters of
    /// `center`.
    ///
    /// Records are first matched against the grid cells around `center`,
    /// then filtered by exact distance. Each successful result is
    /// `Some(meters)` for a match and `None` otherwise; records without a
    /// valid placekey are errors. See [`BatchSummary::matches`].
    pub fn find_nearby<S>(
        &self,
        source: &mut S,
        center: GeoPoint,
        distance_m: f64,
    ) -> crate::spatial::Result<BatchSummary<Option<f64>>>
    where
        S: RecordSource + ?Sized,
        S::Item: PlaceRecord,
    {
        let codec = self.spatial.codec();
        let origin = codec.encode_point(center)?;

        // Past the ring limit every record is checked by exact distance.
        let rings = ring_radius(distance_m, RESOLUTION);
        let candidates: Option<BTreeSet<Placekey>> = if rings <= MAX_NEARBY_RINGS {
            Some(self.spatial.neighbors(origin.as_str(), rings)?)
        } else {
            log_debug!(
                self.logger,
                "{} rings needed for {}m, checking every record",
                rings,
                distance_m
            );
            None
        };

        Ok(self.process(source, |record| -> Result<Option<f64>, String> {
            let placekey = record
                .placekey()
                .ok_or_else(|| "record has no placekey".to_string())?;
            let location = codec
                .to_cell(placekey)
                .map(|cell| codec.encode_cell(cell))
                .map_err(|e| e.to_string())?;

            if let Some(candidates) = &candidates {
                if !candidates.contains(&location) {
                    return Ok(None);
                }
            }

            let meters = self
                .spatial
                .distance(origin.as_str(), location.as_str())
                .map_err(|e| e.to_string())?;
            Ok((meters <= distance_m).then_some(meters))
        }))
    }
}

fn placekey_from_result(result: &Value) -> Result<Placekey, String> {
    match result.get("placekey").and_then(Value::as_str) {
        Some(text) => text
            .parse()
            .map_err(|e| format!("API returned an invalid placekey: {}", e)),
        None => Err(match result.get("error") {
            Some(Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
            None => "API returned no placekey".to_string(),
        }),
    }
}
