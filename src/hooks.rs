use pacechart::storage::SharedStore;
use pacechart::{Calculator, PaceChart};
use std::cell::RefCell;
use std::rc::Rc;
use yew::prelude::*;

/// Shared handle to an engine owned by the app root.
///
/// Mutations through [`EngineHandle::update`] bump a version counter so that
/// components holding the handle as a prop re-render. Gesture bookkeeping
/// that does not change what is drawn goes through [`EngineHandle::quietly`].
pub struct EngineHandle<T> {
    engine: Rc<RefCell<T>>,
    version: UseReducerHandle<Version>,
}

/// Change counter. Increments are applied to the latest state, so callbacks
/// created in an older render still produce a new version.
#[derive(Debug, Default, PartialEq)]
pub struct Version(usize);

impl Reducible for Version {
    type Action = ();

    fn reduce(self: Rc<Self>, _: ()) -> Rc<Self> {
        Rc::new(Version(self.0.wrapping_add(1)))
    }
}

impl<T> Clone for EngineHandle<T> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            version: self.version.clone(),
        }
    }
}

impl<T> PartialEq for EngineHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.engine, &other.engine) && *self.version == *other.version
    }
}

impl<T> EngineHandle<T> {
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.engine.borrow())
    }

    /// Mutate and re-render.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let out = f(&mut self.engine.borrow_mut());
        self.refresh();
        out
    }

    /// Mutate without re-rendering.
    pub fn quietly<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.engine.borrow_mut())
    }

    pub fn refresh(&self) {
        self.version.dispatch(());
    }
}

/// Calculator engine, restored from `store` on first render.
#[hook]
pub fn use_calculator(store: &SharedStore) -> EngineHandle<Calculator> {
    let store = store.clone();
    let engine = use_mut_ref(move || Calculator::new(store));
    let version = use_reducer(Version::default);
    EngineHandle { engine, version }
}

/// Lookup table engine, restored from `store` on first render.
#[hook]
pub fn use_pace_chart(store: &SharedStore) -> EngineHandle<PaceChart> {
    let store = store.clone();
    let engine = use_mut_ref(move || PaceChart::new(store));
    let version = use_reducer(Version::default);
    EngineHandle { engine, version }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_advances_from_current_state() {
        let current = Rc::new(Version(41));
        let next = current.clone().reduce(());
        assert_eq!(*next, Version(42));
        // a second dispatch sees 42, not the value an old render captured
        assert_eq!(*next.reduce(()), Version(43));
    }

    #[test]
    fn version_wraps() {
        assert_eq!(*Rc::new(Version(usize::MAX)).reduce(()), Version(0));
    }
}
