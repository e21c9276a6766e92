//! Real-time subsystem tests

mod delivery_tests;
mod voice_tests;
