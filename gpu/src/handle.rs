//! Uniform lifetime protocol for every GPU-visible object (§3 "Refcounted
//! object", §4.2).
//!
//! Every handle type in this crate (`Buffer<A>`, `Texture<A>`, …) is a
//! thin newtype around `Handle<T>`, an `Arc<T>` with an explicit
//! `add_ref`/`release` surface layered on top of Rust's ordinary
//! `Clone`/`Drop`. Rust's own drop glue is what actually runs the
//! destructor the instant the strong count hits zero — `release` only
//! needs to report the count a caller coming from a reference-counted-COM
//! world (`windows`/`d3d12`'s `IUnknown::AddRef`/`Release`, which this
//! workspace already depends on for the dx12 backend) would expect back.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;

pub struct Handle<T> {
    inner: Arc<T>,
    /// Extra strong references handed out by `add_ref` and not yet
    /// reclaimed by `release`. Shared across every clone of this handle
    /// (not just the instance `add_ref` was called through) so the pair
    /// can be split across two different Rust values the way a COM
    /// `AddRef`/`Release` pair can cross an FFI boundary.
    extra: Arc<Mutex<Vec<Arc<T>>>>,
}

impl<T> Handle<T> {
    pub fn new(inner: T) -> Self {
        Handle { inner: Arc::new(inner), extra: Arc::new(Mutex::new(Vec::new())) }
    }

    /// Mirrors `RefPtr::AddRef`: stashes an extra strong reference inside
    /// the handle rather than forgetting it, so a later `release` has
    /// something real to hand back and drop. Forgetting the clone (as a
    /// bare `mem::forget(Arc::clone(..))` would) bumps the count with no
    /// way to ever undo it.
    pub fn add_ref(&self) -> usize {
        self.extra.lock().push(Arc::clone(&self.inner));
        Arc::strong_count(&self.inner)
    }

    /// Mirrors `RefPtr::Release`: reclaims and drops one reference
    /// stashed by `add_ref`, if any, then drops this handle's own
    /// reference too — `self` is consumed because dropping this handle
    /// is exactly what a `release()` call means.
    pub fn release(self) -> usize {
        self.extra.lock().pop();
        Arc::strong_count(&self.inner).saturating_sub(1)
    }

    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Handle { inner: Arc::clone(&self.inner), extra: Arc::clone(&self.extra) }
    }
}

impl<T> Deref for Handle<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: fmt::Debug> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

/// Purely diagnostic, mutable label carried by every resource (§3).
#[derive(Debug, Default)]
pub struct Label(parking_lot::Mutex<String>);

impl Label {
    pub fn new(label: Option<&str>) -> Self {
        Label(parking_lot::Mutex::new(label.unwrap_or_default().to_string()))
    }

    pub fn get(&self) -> String {
        self.0.lock().clone()
    }

    pub fn set(&self, label: &str) {
        *self.0.lock() = label.to_string();
    }
}
