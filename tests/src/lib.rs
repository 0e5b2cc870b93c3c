//! End-to-end scenarios for the scan pipeline, driven through fake scanners
//! and resolvers so they run without privileges or a network.

#[cfg(test)]
mod discovery;
