//! Systems: units of per-tick behaviour.
//!
//! A system receives the caller's context `C` (usually something holding a
//! `ComponentStore`) and the elapsed time for the tick. Asynchronous systems
//! implement [`AsyncSystem`] and are driven to completion inside their own
//! update via [`Blocking`], so the next system never starts early.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use tickwork_foundation::Result;

/// Future returned by [`AsyncSystem::update`].
pub type SystemFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a>>;

/// Downcasting support for registered systems.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Returns `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A unit of per-tick behaviour.
pub trait System<C>: AsAny {
    /// Human-readable name, used in logs and error context.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once per tick with the elapsed time.
    ///
    /// # Errors
    ///
    /// An error aborts the rest of the tick and is returned from the
    /// scheduler's `run`.
    fn update(&mut self, ctx: &mut C, dt: f64) -> Result<()>;

    /// The system this one wraps, for adapters like [`Blocking`].
    fn wrapped(&self) -> Option<&dyn Any> {
        None
    }

    /// The system this one wraps, mutably.
    fn wrapped_mut(&mut self) -> Option<&mut dyn Any> {
        None
    }
}

/// A system whose per-tick work is asynchronous.
pub trait AsyncSystem<C>: Any {
    /// Human-readable name, used in logs and error context.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Starts the tick's work. The returned future may borrow the context.
    fn update<'a>(&'a mut self, ctx: &'a mut C, dt: f64) -> SystemFuture<'a>;
}

/// Runs an [`AsyncSystem`] as a [`System`], blocking until its future completes.
pub struct Blocking<S>(pub S);

impl<S> Blocking<S> {
    /// Returns the wrapped system.
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.0
    }

    /// Returns the wrapped system mutably.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.0
    }
}

impl<S: fmt::Debug> fmt::Debug for Blocking<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Blocking").field(&self.0).finish()
    }
}

impl<C, S: AsyncSystem<C>> System<C> for Blocking<S> {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn update(&mut self, ctx: &mut C, dt: f64) -> Result<()> {
        pollster::block_on(self.0.update(ctx, dt))
    }

    fn wrapped(&self) -> Option<&dyn Any> {
        Some(&self.0)
    }

    fn wrapped_mut(&mut self) -> Option<&mut dyn Any> {
        Some(&mut self.0)
    }
}

/// A system backed by a closure.
pub struct FnSystem<F> {
    name: String,
    func: F,
}

impl<F> fmt::Debug for FnSystem<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSystem").field("name", &self.name).finish()
    }
}

/// Wraps a closure as a named system.
pub fn system_fn<C, F>(name: impl Into<String>, func: F) -> FnSystem<F>
where
    F: FnMut(&mut C, f64) -> Result<()> + 'static,
{
    FnSystem {
        name: name.into(),
        func,
    }
}

impl<C, F> System<C> for FnSystem<F>
where
    F: FnMut(&mut C, f64) -> Result<()> + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, ctx: &mut C, dt: f64) -> Result<()> {
        (self.func)(ctx, dt)
    }
}
