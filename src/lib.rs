#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use hw_format as format;
pub use hw_model as model;
pub use hw_utils as utils;

pub use hw_model::{Error, Model, ModelPartType, ModelType, Result};
