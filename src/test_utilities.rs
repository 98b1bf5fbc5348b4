// Released under MIT License.
// Copyright (c) 2024 testsys_rs developers

//! Small functions for testing purposes.
