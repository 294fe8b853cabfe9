//! Typed dynamic values addressed by namespace paths such as `Address.Lines[2]` or `Tags[red]`.
//!
//! [`ns::Resolver`] walks a namespace through records, sequences, typed maps, pointers, interfaces and
//! registered custom unwraps; [`ns::write`] coerces text into the scalar found at the end.

/// Value model, namespace resolution and scalar coercion.
pub mod ns;
