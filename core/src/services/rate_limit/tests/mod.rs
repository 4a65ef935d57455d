//! Tests for caller classification, the limiter and the sweeper
