//! Integration tests for skybridge-evolution
//!
//! Uses wiremock to simulate an Evolution API gateway and verifies the
//! instance lifecycle, pairing-artifact probing, and state-gated sends.


mod test_pairing;
mod test_send;
mod test_session;
