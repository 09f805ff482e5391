mod common;
mod tab;
