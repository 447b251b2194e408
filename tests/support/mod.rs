#![allow(dead_code)]

pub mod pausetrim_env;
pub mod wav;
