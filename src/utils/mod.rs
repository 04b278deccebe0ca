//! Cross-cutting helpers shared by the model and the operations.

pub mod parallel;
