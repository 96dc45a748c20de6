mod determinism;
mod network;
mod replication;
mod scenarios;
mod termination;
