//! Skill blending between manual baseline and learned rating

pub mod blender;

pub use blender::{normalize, ExperienceWeight, SkillBlender};
