use std::any::Any;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};

use bitflags::bitflags;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::scope::Scope;
use crate::{RuntimeConfig, RuntimeError};

new_key_type! {
    /// Handle to a mounted component.
    pub struct ComponentId;
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ComponentFlags: u8 {
        /// Queued for re-render.
        const DIRTY = 1 << 0;
        const RENDERING = 1 << 1;
    }
}

type RenderFn = Box<dyn FnMut() -> anyhow::Result<()>>;
pub(crate) type Deferred = Box<dyn FnOnce()>;

thread_local! {
    static CURRENT: RefCell<Option<RenderFrame>> = const { RefCell::new(None) };
}

/// Retained slots of one component.
#[derive(Default)]
pub struct Composer {
    pub slots: Vec<Box<dyn Any>>,
    pub cursor: usize,
    pub keyed_slots: HashMap<String, Box<dyn Any>>,
}

/// Everything a hook can see while its component renders.
pub(crate) struct RenderFrame {
    pub(crate) runtime: Weak<RuntimeInner>,
    pub(crate) id: ComponentId,
    pub(crate) generation: u64,
    composer: Composer,
    effects: SmallVec<[Deferred; 4]>,
}

/// Installs a frame as the current render for its lifetime.
///
/// Hands the render function and the retained slots back to the component's
/// record when finished or dropped, including while unwinding out of a
/// panicking render, so the component stays renderable.
struct ComposeGuard<'a> {
    inner: &'a RuntimeInner,
    id: ComponentId,
    render: Option<RenderFn>,
}

impl<'a> ComposeGuard<'a> {
    fn begin(inner: &'a RuntimeInner, render: RenderFn, frame: RenderFrame) -> Self {
        let id = frame.id;
        CURRENT.with(|c| *c.borrow_mut() = Some(frame));
        ComposeGuard {
            inner,
            id,
            render: Some(render),
        }
    }

    fn call(&mut self) -> anyhow::Result<()> {
        match self.render.as_mut() {
            Some(render) => render(),
            None => Ok(()),
        }
    }

    /// Ends the render and returns the effects it queued.
    fn finish(mut self) -> SmallVec<[Deferred; 4]> {
        self.restore()
    }

    fn restore(&mut self) -> SmallVec<[Deferred; 4]> {
        let render = self.render.take();
        let frame = CURRENT.with(|c| c.borrow_mut().take());
        let Ok(mut components) = self.inner.components.try_borrow_mut() else {
            log::error!("component {:?} could not be restored after render", self.id);
            return SmallVec::new();
        };
        // Unmounted from inside its own render.
        let Some(record) = components.get_mut(self.id) else {
            return SmallVec::new();
        };
        record.flags.remove(ComponentFlags::RENDERING);
        record.render = render;
        match frame {
            Some(frame) => {
                record.composer = Some(frame.composer);
                frame.effects
            }
            None => SmallVec::new(),
        }
    }
}

impl Drop for ComposeGuard<'_> {
    fn drop(&mut self) {
        if self.render.is_some() {
            log::debug!("render of component {:?} unwound; restoring its slots", self.id);
            self.restore();
        }
    }
}

pub(crate) fn is_rendering() -> bool {
    CURRENT.with(|c| c.borrow().is_some())
}

/// Runs `f` against the frame of the component currently rendering.
///
/// Panics when called outside a render: hooks have no component to attach to.
pub(crate) fn with_frame<R>(hook: &str, f: impl FnOnce(&mut RenderFrame) -> R) -> R {
    CURRENT.with(|c| {
        let mut current = c.borrow_mut();
        match current.as_mut() {
            Some(frame) => f(frame),
            None => panic!("{hook} called outside of a component render"),
        }
    })
}

/// Queue `f` to run after the current render completes.
pub(crate) fn defer(f: impl FnOnce() + 'static) {
    with_frame("defer", |frame| frame.effects.push(Box::new(f)));
}

/// Slot-based remember (sequential composition only)
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Rc<T> {
    let (cursor, existing) = with_frame("remember", |frame| {
        let c = &mut frame.composer;
        let cursor = c.cursor;
        c.cursor += 1;
        if cursor >= c.slots.len() {
            // Reserve the position so hooks called from `init` land after it.
            c.slots.push(Box::new(()));
            return (cursor, None);
        }
        (cursor, Some(c.slots[cursor].downcast_ref::<Rc<T>>().cloned()))
    });

    match existing {
        Some(Some(rc)) => rc,
        existing => {
            if existing.is_some() {
                log::warn!(
                    "remember: slot {} type changed; replacing. \
                     If this is due to conditional rendering, prefer remember_with_key.",
                    cursor
                );
            }
            let rc: Rc<T> = Rc::new(init());
            with_frame("remember", |frame| {
                frame.composer.slots[cursor] = Box::new(rc.clone());
            });
            rc
        }
    }
}

/// Key-based remember
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    let key = key.into();
    let existing = with_frame("remember_with_key", |frame| {
        frame
            .composer
            .keyed_slots
            .get(&key)
            .map(|slot| slot.downcast_ref::<Rc<T>>().cloned())
    });

    match existing {
        Some(Some(rc)) => rc,
        existing => {
            if existing.is_some() {
                log::warn!(
                    "remember_with_key: key '{}' reused with a different type; replacing.",
                    key
                );
            }
            let rc: Rc<T> = Rc::new(init());
            with_frame("remember_with_key", |frame| {
                frame.composer.keyed_slots.insert(key, Box::new(rc.clone()));
            });
            rc
        }
    }
}

struct ComponentRecord {
    /// Taken out while the component renders.
    render: Option<RenderFn>,
    composer: Option<Composer>,
    scope: Scope,
    generation: u64,
    renders: u64,
    flags: ComponentFlags,
}

pub(crate) struct RuntimeInner {
    config: RuntimeConfig,
    components: RefCell<SlotMap<ComponentId, ComponentRecord>>,
    dirty: RefCell<VecDeque<ComponentId>>,
}

impl RuntimeInner {
    /// Queue `id` for re-render. Returns false if it is no longer mounted.
    pub(crate) fn invalidate(&self, id: ComponentId) -> bool {
        let mut components = self.components.borrow_mut();
        let Some(record) = components.get_mut(id) else {
            log::trace!("invalidate: component {id:?} is unmounted; ignoring");
            return false;
        };
        if !record.flags.contains(ComponentFlags::DIRTY) {
            record.flags.insert(ComponentFlags::DIRTY);
            self.dirty.borrow_mut().push_back(id);
            log::debug!("component {id:?} invalidated");
        }
        true
    }

    /// Re-render request from an `UpdateFn` captured during cycle `generation`.
    pub(crate) fn request_update(&self, id: ComponentId, generation: u64) {
        let current = self.components.borrow().get(id).map(|r| r.generation);
        match current {
            None => log::trace!("update for unmounted component {id:?} ignored"),
            Some(latest) if latest != generation => {
                if self.config.warn_on_stale_update {
                    log::warn!(
                        "stale update for component {id:?} (render {generation}, latest {latest}) ignored"
                    );
                }
            }
            Some(_) => {
                self.invalidate(id);
            }
        }
    }

    fn pop_dirty(&self) -> Option<ComponentId> {
        let components = self.components.borrow();
        let mut dirty = self.dirty.borrow_mut();
        while let Some(id) = dirty.pop_front() {
            if components
                .get(id)
                .is_some_and(|r| r.flags.contains(ComponentFlags::DIRTY))
            {
                return Some(id);
            }
        }
        None
    }
}

/// Owns the mounted components of one thread and drives their render cycles.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        Self {
            inner: Rc::new(RuntimeInner {
                config,
                components: RefCell::new(SlotMap::with_key()),
                dirty: RefCell::new(VecDeque::new()),
            }),
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    /// Mounts a component and performs its first render.
    ///
    /// If the first render fails the component is unmounted again and the
    /// error returned.
    pub fn mount<F>(&self, render: F) -> Result<ComponentId, RuntimeError>
    where
        F: FnMut() -> anyhow::Result<()> + 'static,
    {
        let id = self.inner.components.borrow_mut().insert(ComponentRecord {
            render: Some(Box::new(render)),
            composer: Some(Composer::default()),
            scope: Scope::new(),
            generation: 0,
            renders: 0,
            flags: ComponentFlags::empty(),
        });
        log::debug!("mounted component {id:?}");

        if let Err(err) = self.render(id) {
            let _ = self.unmount(id);
            return Err(err);
        }
        Ok(id)
    }

    /// Runs one render cycle of `id`, then its deferred effects.
    pub fn render(&self, id: ComponentId) -> Result<(), RuntimeError> {
        if is_rendering() {
            return Err(RuntimeError::ReentrantRender { id });
        }

        let (render, composer, scope, generation) = {
            let mut components = self.inner.components.borrow_mut();
            let record = components
                .get_mut(id)
                .ok_or(RuntimeError::ComponentNotFound { id })?;
            if record.flags.contains(ComponentFlags::RENDERING) {
                return Err(RuntimeError::ReentrantRender { id });
            }
            let render = record
                .render
                .take()
                .ok_or(RuntimeError::ReentrantRender { id })?;
            record.generation += 1;
            record.renders += 1;
            record.flags.remove(ComponentFlags::DIRTY);
            record.flags.insert(ComponentFlags::RENDERING);
            let composer = record.composer.take().unwrap_or_default();
            (render, composer, record.scope.clone(), record.generation)
        };

        log::trace!("render {generation} of component {id:?}");
        let mut guard = ComposeGuard::begin(
            &self.inner,
            render,
            RenderFrame {
                runtime: Rc::downgrade(&self.inner),
                id,
                generation,
                composer: Composer {
                    cursor: 0,
                    ..composer
                },
                effects: SmallVec::new(),
            },
        );
        let result = scope.run(|| guard.call());
        let effects = guard.finish();

        match result {
            Ok(()) => {
                if !effects.is_empty() {
                    log::trace!("running {} effect(s) for component {id:?}", effects.len());
                }
                for effect in effects {
                    effect();
                }
                Ok(())
            }
            Err(source) => {
                log::debug!(
                    "render {generation} of component {id:?} failed; dropping {} effect(s)",
                    effects.len()
                );
                Err(RuntimeError::Render { id, source })
            }
        }
    }

    /// Re-renders dirty components until none remain. Returns the number of
    /// renders performed.
    pub fn flush(&self) -> Result<usize, RuntimeError> {
        let max = self.inner.config.max_render_passes.max(1);
        let mut passes: HashMap<ComponentId, usize> = HashMap::new();
        let mut renders = 0;

        while let Some(id) = self.inner.pop_dirty() {
            let count = passes.entry(id).or_default();
            if *count >= max {
                log::warn!("component {id:?} still dirty after {max} renders");
                // Leave it queued so a later flush can pick it up again.
                self.inner.dirty.borrow_mut().push_front(id);
                return Err(RuntimeError::RenderLoop { id, passes: *count });
            }
            *count += 1;
            self.render(id)?;
            renders += 1;
        }
        Ok(renders)
    }

    /// Disposes the component's scope and drops all of its retained slots.
    pub fn unmount(&self, id: ComponentId) -> Result<(), RuntimeError> {
        let record = self
            .inner
            .components
            .borrow_mut()
            .remove(id)
            .ok_or(RuntimeError::ComponentNotFound { id })?;
        log::debug!("unmounting component {id:?} after {} render(s)", record.renders);
        record.scope.clone().dispose();
        drop(record);
        Ok(())
    }

    pub fn component_count(&self) -> usize {
        self.inner.components.borrow().len()
    }

    pub fn is_mounted(&self, id: ComponentId) -> bool {
        self.inner.components.borrow().contains_key(id)
    }

    pub fn is_dirty(&self, id: ComponentId) -> bool {
        self.inner
            .components
            .borrow()
            .get(id)
            .is_some_and(|r| r.flags.contains(ComponentFlags::DIRTY))
    }

    /// True while `id` is inside its own render function.
    pub fn is_rendering(&self, id: ComponentId) -> bool {
        self.inner
            .components
            .borrow()
            .get(id)
            .is_some_and(|r| r.flags.contains(ComponentFlags::RENDERING))
    }

    pub fn render_count(&self, id: ComponentId) -> Option<u64> {
        self.inner.components.borrow().get(id).map(|r| r.renders)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
