//! Registry trait for self-registering implementations.

/// Base trait for implementation registries.
///
/// Every pluggable implementation module (for instance each candidate store)
/// provides a `Registry` struct implementing this trait, declaring the name
/// it is referenced by in configuration and the factory that builds it.
pub trait ImplementationRegistry {
	/// Configuration key of the implementation, e.g. `"memory"` for
	/// `[storage.implementations.memory]`.
	const NAME: &'static str;

	/// Factory function type, defined by the owning module.
	type Factory;

	/// Returns the factory that builds this implementation from its TOML table.
	fn factory() -> Self::Factory;
}
