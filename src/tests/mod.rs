mod helpers;

mod gating_tests;
