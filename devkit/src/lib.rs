/*!
Devkit for Vanta kernel tests

Keeps the kernel's test modules short:
- fixtures: JSON reading builders matching the kernel's Reading schema
- test_utils: temp data directories and file helpers for sink tests
*/

pub mod fixtures;
pub mod test_utils;

pub use fixtures::ReadingBuilder;
pub use test_utils::TempDataDir;
