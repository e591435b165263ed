/*! Test coverage for core IR operations.
 *
 * Builders, the verifier and the CFG queries are what lowering leans on, so each gets exercised
 * directly here, without going through the front end.
 */

#![allow(unused_imports)]

mod builder_api_tests;
mod type_tests;
