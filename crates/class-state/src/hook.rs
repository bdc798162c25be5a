use std::any::type_name;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use class_state_core::{State, create_state, remember, use_state, use_update, use_update_effect};

use crate::{ClassState, Constructor};

/// Stable handle to the object held by a [`use_class_state`] call-site.
///
/// The same accessor (see [`Accessor::ptr_eq`]) is returned on every render of
/// the component, and [`Accessor::get`] always reads the object currently
/// retained, so it can be stored or captured by callbacks freely.
pub struct Accessor<C: 'static> {
    cell: State<Rc<C>>,
}

impl<C: 'static> Accessor<C> {
    pub fn get(&self) -> Rc<C> {
        self.cell.get()
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.cell.ptr_eq(&other.cell)
    }
}

impl<C: 'static> Clone for Accessor<C> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<C: 'static> fmt::Debug for Accessor<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("class", &type_name::<C>())
            .field("instance", &Rc::as_ptr(&self.cell.get()))
            .finish()
    }
}

/// Holds an instance of `C` as state of the rendering component.
///
/// - On the first render the instance is built with `ctor(args..)`.
/// - Every render installs that render's update callback into the
///   instance's [`UpdateSlot`](crate::UpdateSlot), so
///   [`ClassState::trigger_update`] always reaches the live render cycle.
/// - When `args` differs from the previous render's (`PartialEq`), a new
///   instance is built after the render and replaces the old one, which
///   schedules another render.
///
/// Arguments that never compare equal (a fresh counter, a new allocation
/// compared by address) rebuild the instance on every render.
///
/// ```rust
/// use std::cell::Cell;
/// use class_state::prelude::*;
///
/// #[derive(ClassState)]
/// struct Counter {
///     count: Cell<i32>,
///     slot: UpdateSlot,
/// }
///
/// impl Counter {
///     fn new(start: i32) -> Self {
///         Self { count: Cell::new(start), slot: UpdateSlot::new() }
///     }
///
///     fn increment(&self) {
///         self.count.set(self.count.get() + 1);
///         self.trigger_update();
///     }
/// }
///
/// let runtime = Runtime::new();
/// runtime
///     .mount(|| {
///         let counter = use_class_state(Counter::new, (0,));
///         if counter.get().count.get() == 0 {
///             counter.get().increment();
///         }
///         Ok(())
///     })
///     .unwrap();
/// assert_eq!(runtime.flush().unwrap(), 1);
/// ```
pub fn use_class_state<C, Args, Ctor>(ctor: Ctor, args: Args) -> Accessor<C>
where
    C: ClassState,
    Args: PartialEq + Clone + 'static,
    Ctor: Constructor<Args, Output = C>,
{
    let cell = use_state(|| {
        log::trace!("constructing {}", type_name::<C>());
        Rc::new(ctor.construct(args.clone()))
    });

    let update = use_update();
    cell.with(|instance| instance.update_slot().install(update));

    use_update_effect(args, {
        let cell = cell.clone();
        move |args: &Args| {
            log::debug!("arguments changed; reconstructing {}", type_name::<C>());
            cell.set(Rc::new(ctor.construct(args.clone())));
        }
    });

    Accessor { cell }
}

/// [`use_class_state`] for constructors returning `Result`.
///
/// A failure on the first render is returned straight away. A failure while
/// rebuilding after an argument change keeps the previous instance and is
/// returned from the next render of this call-site instead.
pub fn try_use_class_state<C, E, Args, Ctor>(ctor: Ctor, args: Args) -> Result<Accessor<C>, E>
where
    C: ClassState,
    E: 'static,
    Args: PartialEq + Clone + 'static,
    Ctor: Constructor<Args, Output = Result<C, E>>,
{
    let retained = remember(|| RefCell::new(None::<State<Rc<C>>>));
    let failure = remember(|| RefCell::new(None::<E>));
    let update = use_update();

    let existing = retained.borrow().clone();
    let cell = match existing {
        Some(cell) => cell,
        None => match ctor.construct(args.clone()) {
            Ok(instance) => {
                log::trace!("constructed {}", type_name::<C>());
                let cell = create_state(Rc::new(instance));
                *retained.borrow_mut() = Some(cell.clone());
                cell
            }
            Err(err) => {
                // Keep the effect slot in place for renders that carry on.
                use_update_effect(args, |_| {});
                return Err(err);
            }
        },
    };

    cell.with(|instance| instance.update_slot().install(update.clone()));

    use_update_effect(args, {
        let cell = cell.clone();
        let failure = failure.clone();
        move |args: &Args| match ctor.construct(args.clone()) {
            Ok(instance) => {
                log::debug!("arguments changed; reconstructed {}", type_name::<C>());
                cell.set(Rc::new(instance));
            }
            Err(err) => {
                log::debug!(
                    "arguments changed; reconstructing {} failed, keeping previous instance",
                    type_name::<C>()
                );
                *failure.borrow_mut() = Some(err);
                update.call();
            }
        }
    });

    let pending = failure.borrow_mut().take();
    match pending {
        Some(err) => Err(err),
        None => Ok(Accessor { cell }),
    }
}
