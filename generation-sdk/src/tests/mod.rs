//! Mock-server tests for the Generation SDK
