mod fakes;
mod integration;
mod persistence;
