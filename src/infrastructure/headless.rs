//! In-memory adapters for running the chart without a browser.
//!
//! The recording surface writes everything it is asked to do into a shared
//! [`SurfaceJournal`]; the manual sources fire their handlers on demand.

use crate::domain::chart::{
    ChartSurface, ContainerEnvironment, CssColor, OptionsPatch, ResizeSource, SeriesData,
    SeriesHandle, SeriesKind, Subscription, SurfaceFactory, SurfaceOptions, ThemeName,
    ThemeSource, ThemedOption,
};
use crate::domain::errors::{ChartError, ChartResult};
use crate::domain::logging::{LogComponent, TimeProvider};
use crate::log_warn;
use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Which series constructors a recording surface accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceCapabilities {
    pub native_candlestick: bool,
    pub native_area: bool,
    pub generic: bool,
}

impl SurfaceCapabilities {
    pub fn full() -> Self {
        Self { native_candlestick: true, native_area: true, generic: true }
    }

    /// Only the infallible line constructor works.
    pub fn line_only() -> Self {
        Self { native_candlestick: false, native_area: false, generic: false }
    }

    fn native(&self, kind: SeriesKind) -> bool {
        match kind {
            SeriesKind::Candlestick => self.native_candlestick,
            SeriesKind::Area => self.native_area,
            SeriesKind::Line => true,
        }
    }
}

impl Default for SurfaceCapabilities {
    fn default() -> Self {
        Self::full()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSeries {
    pub handle: SeriesHandle,
    pub kind: SeriesKind,
    pub data: Option<SeriesData>,
    pub writes: usize,
}

/// Shared record of a recording surface's life.
#[derive(Debug, Default)]
pub struct SurfaceJournal {
    pub surfaces_created: usize,
    pub options: Option<SurfaceOptions>,
    pub patches: Vec<OptionsPatch>,
    pub series: Vec<RecordedSeries>,
    pub rejected: Vec<SeriesKind>,
    pub removed: bool,
}

impl SurfaceJournal {
    pub fn series(&self, handle: SeriesHandle) -> Option<&RecordedSeries> {
        self.series.iter().find(|series| series.handle == handle)
    }

    pub fn total_writes(&self) -> usize {
        self.series.iter().map(|series| series.writes).sum()
    }
}

pub struct RecordingSurface {
    journal: Rc<RefCell<SurfaceJournal>>,
    capabilities: SurfaceCapabilities,
    next_handle: u32,
    removed: bool,
}

impl RecordingSurface {
    fn attach(&mut self, kind: SeriesKind) -> SeriesHandle {
        self.next_handle += 1;
        let handle = SeriesHandle(self.next_handle);
        self.journal.borrow_mut().series.push(RecordedSeries {
            handle,
            kind,
            data: None,
            writes: 0,
        });
        handle
    }

    fn reject(&mut self, kind: SeriesKind, strategy: &'static str) -> ChartError {
        self.journal.borrow_mut().rejected.push(kind);
        ChartError::CapabilityUnavailable { kind, strategy }
    }
}

impl ChartSurface for RecordingSurface {
    fn apply_options(&mut self, patch: &OptionsPatch) {
        let mut journal = self.journal.borrow_mut();
        if let Some(options) = journal.options.as_mut() {
            options.apply(patch);
        }
        journal.patches.push(patch.clone());
    }

    fn add_native_series(&mut self, kind: SeriesKind) -> ChartResult<SeriesHandle> {
        if self.capabilities.native(kind) {
            Ok(self.attach(kind))
        } else {
            Err(self.reject(kind, "native"))
        }
    }

    fn add_series(&mut self, kind: SeriesKind) -> ChartResult<SeriesHandle> {
        if self.capabilities.generic {
            Ok(self.attach(kind))
        } else {
            Err(self.reject(kind, "generic"))
        }
    }

    fn add_line_series(&mut self) -> SeriesHandle {
        self.attach(SeriesKind::Line)
    }

    fn set_data(&mut self, series: SeriesHandle, data: SeriesData) {
        if self.removed {
            log_warn!(LogComponent::Infrastructure("Headless"), "set_data after remove");
            return;
        }
        let mut journal = self.journal.borrow_mut();
        if let Some(recorded) = journal.series.iter_mut().find(|s| s.handle == series) {
            recorded.data = Some(data);
            recorded.writes += 1;
        }
    }

    fn remove(&mut self) {
        self.removed = true;
        self.journal.borrow_mut().removed = true;
    }
}

/// Hands out recording surfaces that share one journal.
#[derive(Default)]
pub struct RecordingSurfaceFactory {
    journal: Rc<RefCell<SurfaceJournal>>,
    capabilities: SurfaceCapabilities,
}

impl RecordingSurfaceFactory {
    pub fn new(capabilities: SurfaceCapabilities) -> Self {
        Self { journal: Rc::default(), capabilities }
    }

    pub fn journal(&self) -> Rc<RefCell<SurfaceJournal>> {
        Rc::clone(&self.journal)
    }
}

impl SurfaceFactory for RecordingSurfaceFactory {
    type Surface = RecordingSurface;

    fn create(&self, options: &SurfaceOptions) -> ChartResult<RecordingSurface> {
        {
            let mut journal = self.journal.borrow_mut();
            journal.surfaces_created += 1;
            journal.options = Some(options.clone());
            journal.series.clear();
            journal.removed = false;
        }
        Ok(RecordingSurface {
            journal: Rc::clone(&self.journal),
            capabilities: self.capabilities,
            next_handle: 0,
            removed: false,
        })
    }
}

struct Registry<T> {
    next_id: u64,
    handlers: Vec<(u64, Box<dyn FnMut(T)>)>,
    emitting: bool,
    /// Ids cancelled while their handler was taken out for an emit.
    cancelled: Vec<u64>,
}

/// Handler list whose subscriptions remove themselves on cancel.
///
/// Handlers run with the registry unborrowed, so they may subscribe or
/// cancel (their own subscription included) while being notified.
struct HandlerRegistry<T> {
    inner: Rc<RefCell<Registry<T>>>,
}

impl<T: Copy + 'static> HandlerRegistry<T> {
    fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                handlers: Vec::new(),
                emitting: false,
                cancelled: Vec::new(),
            })),
        }
    }

    fn subscribe(&self, handler: Box<dyn FnMut(T)>) -> Subscription {
        let id = {
            let mut registry = self.inner.borrow_mut();
            registry.next_id += 1;
            let id = registry.next_id;
            registry.handlers.push((id, handler));
            id
        };
        let registry = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            let Some(registry) = registry.upgrade() else { return };
            let mut registry = registry.borrow_mut();
            let before = registry.handlers.len();
            registry.handlers.retain(|(handler_id, _)| *handler_id != id);
            if registry.handlers.len() == before && registry.emitting {
                registry.cancelled.push(id);
            }
        })
    }

    fn emit(&self, value: T) {
        let mut running = {
            let mut registry = self.inner.borrow_mut();
            registry.emitting = true;
            std::mem::take(&mut registry.handlers)
        };

        for (id, handler) in running.iter_mut() {
            if self.inner.borrow().cancelled.contains(id) {
                continue;
            }
            handler(value);
        }

        let mut registry = self.inner.borrow_mut();
        let cancelled = std::mem::take(&mut registry.cancelled);
        running.retain(|(id, _)| !cancelled.contains(id));
        running.append(&mut registry.handlers);
        registry.handlers = running;
        registry.emitting = false;
    }

    fn len(&self) -> usize {
        let registry = self.inner.borrow();
        registry.handlers.len()
    }
}

/// Resize source fired by calling [`ManualResizeSource::emit`].
pub struct ManualResizeSource {
    registry: HandlerRegistry<()>,
}

impl ManualResizeSource {
    pub fn new() -> Self {
        Self { registry: HandlerRegistry::new() }
    }

    pub fn emit(&self) {
        self.registry.emit(());
    }

    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }
}

impl Default for ManualResizeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ResizeSource for ManualResizeSource {
    fn on_resize(&self, mut handler: Box<dyn FnMut()>) -> Subscription {
        self.registry.subscribe(Box::new(move |()| handler()))
    }
}

/// Theme source with settable colors; `set_theme` notifies listeners.
pub struct ManualThemeSource {
    theme: Cell<ThemeName>,
    colors: RefCell<HashMap<ThemedOption, CssColor>>,
    registry: HandlerRegistry<ThemeName>,
}

impl ManualThemeSource {
    pub fn new(theme: ThemeName) -> Self {
        Self {
            theme: Cell::new(theme),
            colors: RefCell::new(HashMap::new()),
            registry: HandlerRegistry::new(),
        }
    }

    pub fn set_color(&self, option: ThemedOption, color: Option<&str>) {
        let mut colors = self.colors.borrow_mut();
        match color.and_then(CssColor::parse) {
            Some(color) => colors.insert(option, color),
            None => colors.remove(&option),
        };
    }

    pub fn colors(&self) -> Ref<'_, HashMap<ThemedOption, CssColor>> {
        self.colors.borrow()
    }

    pub fn set_theme(&self, theme: ThemeName) {
        self.theme.set(theme);
        self.registry.emit(theme);
    }

    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }
}

impl ThemeSource for ManualThemeSource {
    fn current_theme(&self) -> ThemeName {
        self.theme.get()
    }

    fn read_color(&self, option: ThemedOption) -> Option<CssColor> {
        self.colors.borrow().get(&option).cloned()
    }

    fn on_theme_change(&self, handler: Box<dyn FnMut(ThemeName)>) -> Subscription {
        self.registry.subscribe(handler)
    }
}

/// Container with a settable width.
pub struct FixedContainer {
    width: Cell<u32>,
}

impl FixedContainer {
    pub fn new(width: u32) -> Self {
        Self { width: Cell::new(width) }
    }

    pub fn set_width(&self, width: u32) {
        self.width.set(width);
    }
}

impl ContainerEnvironment for FixedContainer {
    fn width(&self) -> u32 {
        self.width.get()
    }
}

/// Clock pinned to a settable epoch-millisecond value.
pub struct FixedTimeProvider {
    now_ms: AtomicU64,
}

impl FixedTimeProvider {
    pub fn new(now_ms: u64) -> Self {
        Self { now_ms: AtomicU64::new(now_ms) }
    }

    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl TimeProvider for FixedTimeProvider {
    fn current_timestamp(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
