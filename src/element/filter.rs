//! The wrapper filter.
//!
//! A [`FilterAdapter`] binds one component from a [`ComponentRegistry`] and
//! exposes one pin per component stream. The component is created aggregated:
//! it receives the adapter as its [`Outer`] and may route its own delegating
//! queries back through it.
//!
//! # Lifecycle
//!
//! ```text
//!   Stopped ──pause──▶ Paused ──run──▶ Running
//!      ▲                 │  ▲            │
//!      └──────stop───────┘  └───pause────┘
//! ```
//!
//! - `Stopped → Paused`: allocate streaming resources, commit output allocators
//! - `Paused → Stopped`: flush, decommit output allocators, free resources
//! - `Stopped → Running` and `Running → Stopped` pass through `Paused`

use super::{FilterState, InputPin, OutputPin, Pin};
use crate::component::{ComponentRegistry, MediaObject, Stream, StreamFlags};
use crate::config::WrapperConfig;
use crate::enumerator::{Enumerator, PinEnumerator, Snapshot};
use crate::error::{Error, Result};
use crate::format::WRAPPER_CLASS_ID;
use crate::memory::MediaSample;
use crate::observability::span_state_change;
use crate::unknown::{Capability, Interface, Outer, Unknown};
use parking_lot::Mutex;
use std::sync::{Arc, OnceLock, Weak};
use tracing::{debug, trace, warn};
use uuid::Uuid;

/// Name and graph membership of a filter.
#[derive(Clone, Default)]
pub struct FilterInfo {
    /// Name assigned by the graph.
    pub name: String,
    /// The graph the filter has joined, if still alive.
    pub graph: Option<Arc<dyn Unknown>>,
}

impl std::fmt::Debug for FilterInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterInfo")
            .field("name", &self.name)
            .field("graph", &self.graph.is_some())
            .finish()
    }
}

#[derive(Default)]
struct Membership {
    name: String,
    graph: Option<Weak<dyn Unknown>>,
}

/// The bound component and the pins derived from it.
struct Binding {
    class_id: Uuid,
    category: Uuid,
    identity: Arc<dyn Unknown>,
    object: Arc<dyn MediaObject>,
    inputs: Vec<Arc<InputPin>>,
    outputs: Vec<Arc<OutputPin>>,
}

/// Exposes a wrapped component as a filter with pins.
pub struct FilterAdapter {
    this: Weak<FilterAdapter>,
    registry: Arc<ComponentRegistry>,
    config: WrapperConfig,
    binding: OnceLock<Binding>,
    state: Mutex<FilterState>,
    membership: Mutex<Membership>,
}

impl FilterAdapter {
    /// Create an unbound filter with the default configuration.
    pub fn new(registry: Arc<ComponentRegistry>) -> Arc<Self> {
        Self::with_config(registry, WrapperConfig::default())
    }

    /// Create an unbound filter.
    pub fn with_config(registry: Arc<ComponentRegistry>, config: WrapperConfig) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            registry,
            config,
            binding: OnceLock::new(),
            state: Mutex::new(FilterState::Stopped),
            membership: Mutex::new(Membership::default()),
        })
    }

    /// Activate a filter and return `capability` on it.
    ///
    /// With an `outer` object only [`Capability::Unknown`] can be requested.
    /// The filter does not delegate to `outer`; it answers as itself.
    pub fn create_instance(
        registry: Arc<ComponentRegistry>,
        outer: Option<&Arc<dyn Unknown>>,
        capability: &Capability,
    ) -> Result<Interface> {
        if outer.is_some() && *capability != Capability::Unknown {
            return Err(Error::NoInterface(*capability));
        }
        Self::new(registry).query_capability(capability)
    }

    fn this(&self) -> Result<Arc<FilterAdapter>> {
        self.this.upgrade().ok_or(Error::Released)
    }

    fn binding(&self) -> Result<&Binding> {
        self.binding
            .get()
            .ok_or_else(|| Error::init("no component is bound"))
    }

    /// Bind the component registered as `class_id` under `category`.
    pub fn init(&self, class_id: &Uuid, category: &Uuid) -> Result<()> {
        if self.binding.get().is_some() {
            return Err(Error::init("a component is already bound"));
        }

        let registration = self.registry.lookup(class_id, category)?;
        let outer: Weak<dyn Unknown> = self.this.clone();
        let identity = registration
            .factory
            .create_instance(Outer::from_weak(outer))
            .map_err(|e| Error::init(format!("cannot create {}: {e}", registration.name)))?;
        let object = identity
            .query_capability(&Capability::MediaObject)
            .ok()
            .and_then(Interface::into_media_object)
            .ok_or_else(|| Error::init(format!("{} is not a media object", registration.name)))?;

        let (n_inputs, n_outputs) = object
            .stream_count()
            .map_err(|e| Error::init(format!("cannot query stream count: {e}")))?;
        let total = n_inputs.saturating_add(n_outputs);
        if total == 0 || total > self.config.max_streams {
            return Err(Error::init(format!(
                "unsupported stream count {n_inputs} in / {n_outputs} out"
            )));
        }

        let stream_flags = |stream: Stream| -> Result<StreamFlags> {
            object
                .stream_info(stream)
                .map_err(|e| Error::init(format!("cannot query {stream} info: {e}")))
        };
        let inputs = (0..n_inputs)
            .map(|i| -> Result<Arc<InputPin>> {
                Ok(InputPin::new(self.this.clone(), i, stream_flags(Stream::Input(i))?))
            })
            .collect::<Result<Vec<_>>>()?;
        let outputs = (0..n_outputs)
            .map(|i| -> Result<Arc<OutputPin>> {
                Ok(OutputPin::new(self.this.clone(), i, stream_flags(Stream::Output(i))?))
            })
            .collect::<Result<Vec<_>>>()?;

        self.binding
            .set(Binding {
                class_id: *class_id,
                category: *category,
                identity,
                object,
                inputs,
                outputs,
            })
            .map_err(|_| Error::init("a component is already bound"))?;

        debug!(
            component = %registration.name,
            inputs = n_inputs,
            outputs = n_outputs,
            "component bound"
        );
        Ok(())
    }

    /// Whether a component is bound.
    pub fn is_initialized(&self) -> bool {
        self.binding.get().is_some()
    }

    /// Class id and category of the bound component.
    pub fn component_class(&self) -> Option<(Uuid, Uuid)> {
        self.binding.get().map(|b| (b.class_id, b.category))
    }

    /// The filter's own class id.
    pub fn class_id(&self) -> Uuid {
        WRAPPER_CLASS_ID
    }

    /// Configuration.
    pub fn config(&self) -> &WrapperConfig {
        &self.config
    }

    pub(crate) fn media_object(&self) -> Result<Arc<dyn MediaObject>> {
        Ok(self.binding()?.object.clone())
    }

    pub(crate) fn input_pins(&self) -> &[Arc<InputPin>] {
        self.binding.get().map(|b| b.inputs.as_slice()).unwrap_or_default()
    }

    pub(crate) fn output_pins(&self) -> &[Arc<OutputPin>] {
        self.binding.get().map(|b| b.outputs.as_slice()).unwrap_or_default()
    }

    /// All pins, inputs first, each in ascending stream order.
    pub fn pins(&self) -> Vec<Arc<dyn Pin>> {
        let inputs = self.input_pins().iter().map(|p| p.clone() as Arc<dyn Pin>);
        let outputs = self.output_pins().iter().map(|p| p.clone() as Arc<dyn Pin>);
        inputs.chain(outputs).collect()
    }

    /// Enumerate the pins. The enumerator keeps the filter alive.
    pub fn enum_pins(&self) -> Result<PinEnumerator> {
        let owner: Arc<dyn Unknown> = self.this()?;
        Ok(Enumerator::new(Arc::new(Snapshot::new(self.pins(), Some(owner)))))
    }

    /// Find a pin by its exact name.
    pub fn find_pin(&self, name: &str) -> Result<Arc<dyn Pin>> {
        self.pins()
            .into_iter()
            .find(|pin| pin.id() == name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Name and graph.
    pub fn filter_info(&self) -> FilterInfo {
        let membership = self.membership.lock();
        FilterInfo {
            name: membership.name.clone(),
            graph: membership.graph.as_ref().and_then(Weak::upgrade),
        }
    }

    /// Record graph membership. `None` leaves the graph.
    pub fn join_graph(&self, graph: Option<&Arc<dyn Unknown>>, name: &str) -> Result<()> {
        let mut membership = self.membership.lock();
        membership.graph = graph.map(Arc::downgrade);
        membership.name = if graph.is_some() {
            name.to_string()
        } else {
            String::new()
        };
        Ok(())
    }

    /// Peers of connected input pins, in stream order.
    pub(crate) fn upstream_peers(&self) -> Vec<Arc<dyn Pin>> {
        self.input_pins()
            .iter()
            .filter_map(|p| p.core().peer().ok())
            .collect()
    }

    /// Peers of connected output pins, in stream order.
    pub(crate) fn downstream_peers(&self) -> Vec<Arc<dyn Pin>> {
        self.output_pins()
            .iter()
            .filter_map(|p| p.core().peer().ok())
            .collect()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Current lifecycle state.
    pub fn state(&self) -> FilterState {
        *self.state.lock()
    }

    pub(crate) fn ensure_stopped(&self) -> Result<()> {
        match self.state() {
            FilterState::Stopped => Ok(()),
            _ => Err(Error::NotStopped),
        }
    }

    /// Stop streaming.
    pub fn stop(&self) -> Result<()> {
        self.set_state(FilterState::Stopped)
    }

    /// Pause streaming.
    pub fn pause(&self) -> Result<()> {
        self.set_state(FilterState::Paused)
    }

    /// Start streaming.
    pub fn run(&self) -> Result<()> {
        self.set_state(FilterState::Running)
    }

    /// Move to `target` one adjacent state at a time.
    ///
    /// On failure the filter stays in the last state it reached.
    pub fn set_state(&self, target: FilterState) -> Result<()> {
        let binding = self.binding()?;
        let mut at = self.state();
        let steps = at.path_to(target);
        if steps.is_empty() {
            return Ok(());
        }

        let name = self.membership.lock().name.clone();
        let _span = span_state_change(&self.config.tracing, &name, &target.to_string()).entered();
        for next in steps {
            self.step(binding, at, next)?;
            *self.state.lock() = next;
            debug!(from = %at, to = %next, "state changed");
            at = next;
        }
        Ok(())
    }

    fn step(&self, binding: &Binding, from: FilterState, to: FilterState) -> Result<()> {
        match (from, to) {
            (FilterState::Stopped, FilterState::Paused) => {
                binding.object.allocate_streaming_resources()?;
                if let Err(e) = self.commit_allocators(binding) {
                    self.decommit_allocators(binding);
                    if let Err(free) = binding.object.free_streaming_resources() {
                        warn!(error = %free, "failed to free streaming resources");
                    }
                    return Err(e);
                }
                Ok(())
            }
            (FilterState::Paused, FilterState::Stopped) => {
                binding.object.flush()?;
                self.decommit_allocators(binding);
                binding.object.free_streaming_resources()
            }
            _ => Ok(()),
        }
    }

    fn commit_allocators(&self, binding: &Binding) -> Result<()> {
        for pin in &binding.outputs {
            if let Some(allocator) = pin.allocator() {
                allocator.commit()?;
            }
        }
        Ok(())
    }

    fn decommit_allocators(&self, binding: &Binding) {
        for pin in &binding.outputs {
            if let Some(allocator) = pin.allocator() {
                allocator.decommit();
            }
        }
    }

    // ========================================================================
    // Streaming
    // ========================================================================

    /// Pull all pending output from the component.
    ///
    /// Connected outputs fill pooled buffers and deliver non-empty results
    /// downstream. Unconnected outputs are discarded, unless optional, in
    /// which case they are skipped.
    pub(crate) fn drain_outputs(&self) -> Result<()> {
        let binding = self.binding()?;
        for pin in &binding.outputs {
            let index = pin.index();
            match pin.downstream() {
                Some(downstream) => {
                    for _ in 0..self.config.max_output_passes {
                        let mut buffer = downstream.allocator.acquire()?;
                        let status = binding
                            .object
                            .process_output(index, Some(buffer.data_mut()))?;
                        if !buffer.is_empty() {
                            let sample = MediaSample {
                                data: buffer.into_bytes(),
                                time: status.time,
                                sync_point: status.sync_point,
                                ..MediaSample::default()
                            };
                            pin.deliver(&downstream, sample)?;
                        }
                        if !status.incomplete {
                            break;
                        }
                    }
                }
                None if pin.core().flags().contains(StreamFlags::OPTIONAL) => {
                    trace!(output = index, "skipping optional output");
                }
                None => {
                    for _ in 0..self.config.max_output_passes {
                        let status = binding.object.process_output(index, None)?;
                        if !status.incomplete {
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl Unknown for FilterAdapter {
    fn query_capability(&self, capability: &Capability) -> Result<Interface> {
        match capability {
            Capability::Unknown => Ok(Interface::Unknown(self.this()?)),
            Capability::Filter
            | Capability::MediaFilter
            | Capability::Persist
            | Capability::WrapperFilter => Ok(Interface::Filter(self.this()?)),
            Capability::MediaObject | Capability::Custom(_) => match self.binding.get() {
                Some(binding) => binding.identity.query_capability(capability),
                None => Err(Error::NoInterface(*capability)),
            },
            other => Err(Error::NoInterface(*other)),
        }
    }
}

impl Drop for FilterAdapter {
    fn drop(&mut self) {
        let state = *self.state.get_mut();
        let Some(binding) = self.binding.get() else {
            return;
        };
        if state == FilterState::Stopped {
            return;
        }
        debug!(%state, "releasing active filter");
        if let Err(e) = binding.object.flush() {
            warn!(error = %e, "flush failed during teardown");
        }
        self.decommit_allocators(binding);
        if let Err(e) = binding.object.free_streaming_resources() {
            warn!(error = %e, "failed to free streaming resources during teardown");
        }
    }
}

impl std::fmt::Debug for FilterAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterAdapter")
            .field("component", &self.component_class())
            .field("state", &self.state())
            .field("pins", &self.pins().len())
            .finish()
    }
}
