//! Drives a `Counter` object through a component from the command line.
//!
//! ```text
//! RUST_LOG=debug cargo run -p counter -- inc inc start=10 dec
//! ```
//!
//! `inc`/`dec` call methods on the held object, which re-render the
//! component themselves; `start=N` changes the constructor argument, which
//! rebuilds the object.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::{Context, bail};
use class_state::prelude::*;

#[derive(ClassState)]
struct Counter {
    count: Cell<i64>,
    slot: UpdateSlot,
}

impl Counter {
    fn new(start: i64) -> Self {
        log::info!("new Counter starting at {start}");
        Self {
            count: Cell::new(start),
            slot: UpdateSlot::new(),
        }
    }

    fn add(&self, delta: i64) {
        self.count.set(self.count.get() + delta);
        self.trigger_update();
    }
}

enum Action {
    Add(i64),
    Start(i64),
}

fn parse(arg: &str) -> anyhow::Result<Action> {
    match arg {
        "inc" => Ok(Action::Add(1)),
        "dec" => Ok(Action::Add(-1)),
        _ => match arg.strip_prefix("start=") {
            Some(n) => Ok(Action::Start(
                n.parse().with_context(|| format!("bad start value {n:?}"))?,
            )),
            None => bail!("unknown action {arg:?}; expected inc, dec or start=N"),
        },
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let actions = std::env::args()
        .skip(1)
        .map(|a| parse(&a))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let runtime = Runtime::new();
    let start = Rc::new(Cell::new(0));
    let counter: Rc<RefCell<Option<Accessor<Counter>>>> = Rc::new(RefCell::new(None));

    let id = runtime.mount({
        let start = start.clone();
        let counter = counter.clone();
        move || {
            let held = use_class_state(Counter::new, (start.get(),));
            println!("[render] count = {}", held.get().count.get());
            *counter.borrow_mut() = Some(held);
            Ok(())
        }
    })?;

    let Some(held) = counter.borrow().clone() else {
        bail!("component did not render");
    };

    for action in actions {
        match action {
            Action::Add(delta) => held.get().add(delta),
            Action::Start(n) => {
                start.set(n);
                runtime.render(id)?;
            }
        }
        let renders = runtime.flush()?;
        log::debug!("flushed {renders} render(s)");
    }

    runtime.unmount(id)?;
    Ok(())
}
