/// Unit tests of the streak engine through the public API
mod basic_tests;
mod streak_properties;
