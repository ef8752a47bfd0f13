mod orchestrator_tests;
mod settings_flow_tests;
mod support;
