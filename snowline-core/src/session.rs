//! Application state for one viewer: the current forecast, the selection on
//! top of it and the single in-flight load.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use tracing::{debug, info, warn};

use crate::{
    aggregate::{Summary, summarize},
    error::FetchError,
    model::{Coordinate, ForecastSeries, SelectionWindow},
    provider::ForecastProvider,
    view::{ForecastView, HeaderView, forecast_view},
};

/// Holds at most one forecast and the selection over it.
///
/// A new series replaces the old one wholesale and resets the selection to
/// its full range.
#[derive(Debug, Default)]
pub struct SeriesStore {
    current: Option<(Arc<ForecastSeries>, SelectionWindow)>,
}

impl SeriesStore {
    pub fn replace(&mut self, series: ForecastSeries) {
        let window = series.full_window();
        self.current = Some((Arc::new(series), window));
    }

    pub fn current(&self) -> Option<Arc<ForecastSeries>> {
        self.current.as_ref().map(|(series, _)| Arc::clone(series))
    }

    pub fn window(&self) -> Option<SelectionWindow> {
        self.current.as_ref().map(|(_, window)| *window)
    }

    /// Move the selection, clamped to the stored series.
    pub fn select(&mut self, start: usize, end: usize) -> Option<SelectionWindow> {
        let (series, window) = self.current.as_mut()?;
        *window = SelectionWindow::clamped(start, end, series.len())?;
        Some(*window)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}

/// What happened to a load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The store now holds a forecast with this many hours.
    Loaded { hours: usize },
    /// Another load was in flight; the request was dropped.
    Ignored,
}

#[derive(Debug)]
struct SessionState {
    store: SeriesStore,
    header: HeaderView,
}

/// Explicit state for one viewer, shared by the location and selection handlers.
#[derive(Debug)]
pub struct ForecastSession {
    provider: Box<dyn ForecastProvider>,
    state: Mutex<SessionState>,
    in_flight: AtomicBool,
    requests: AtomicU64,
}

/// Clears the in-flight flag when the load finishes, fails or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ForecastSession {
    pub fn new(provider: Box<dyn ForecastProvider>) -> Self {
        Self {
            provider,
            state: Mutex::new(SessionState {
                store: SeriesStore::default(),
                header: HeaderView::idle(),
            }),
            in_flight: AtomicBool::new(false),
            requests: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn try_begin(&self) -> Option<InFlight<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight(&self.in_flight))
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Fetch the forecast for `coordinate` and make it current.
    ///
    /// While another load is running the request is dropped and
    /// [`LoadOutcome::Ignored`] returned. On failure the stored forecast is
    /// kept and only the header switches to the error caption.
    pub async fn load_at(&self, coordinate: Coordinate) -> Result<LoadOutcome, FetchError> {
        let Some(_guard) = self.try_begin() else {
            debug!(
                lat = coordinate.latitude,
                lon = coordinate.longitude,
                "load already in flight, ignoring"
            );
            return Ok(LoadOutcome::Ignored);
        };

        let request = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            request,
            lat = coordinate.latitude,
            lon = coordinate.longitude,
            "loading forecast"
        );

        match self.provider.fetch_forecast(&coordinate).await {
            Ok(series) => {
                let hours = series.len();
                let mut state = self.lock();
                state.header = HeaderView::for_series(&series);
                state.store.replace(series);
                info!(request, hours, "forecast loaded");
                Ok(LoadOutcome::Loaded { hours })
            }
            Err(err) => {
                warn!(request, error = %err, "forecast load failed");
                self.lock().header = HeaderView::failed();
                Err(err)
            }
        }
    }

    /// Apply a slider change. `None` until a forecast is loaded.
    pub fn select(&self, start: usize, end: usize) -> Option<SelectionWindow> {
        let window = self.lock().store.select(start, end);
        debug!(?window, "selection changed");
        window
    }

    pub fn series(&self) -> Option<Arc<ForecastSeries>> {
        self.lock().store.current()
    }

    pub fn window(&self) -> Option<SelectionWindow> {
        self.lock().store.window()
    }

    pub fn header(&self) -> HeaderView {
        self.lock().header.clone()
    }

    pub fn summary(&self) -> Option<Summary> {
        let state = self.lock();
        let series = state.store.current()?;
        let window = state.store.window()?;
        Some(summarize(&series, window))
    }

    /// Build a full frame for the current state.
    pub fn view(&self) -> Option<ForecastView> {
        let state = self.lock();
        let series = state.store.current()?;
        let window = state.store.window()?;
        Some(forecast_view(&series, window, state.header.clone()))
    }
}
