//! Balance simulator for Card Clicker.
//! Run with: cargo test simulate_greedy -- --nocapture
