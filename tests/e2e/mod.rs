mod rewriter_tests;
mod session_flow_tests;
