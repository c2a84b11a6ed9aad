//! # Tool-switch accessor generation from MSBuild-style rule schemas
//!
//! A rule schema (the XML `Rule` files build tools use to describe their
//! command-line switches) lists typed properties under a rule with a switch
//! prefix. This crate reads the first rule of such a file and emits one C#
//! accessor per `StringListProperty`, `BoolProperty`, `IntProperty` and
//! `EnumProperty`. Each accessor reads from and registers into the
//! `ActiveToolSwitches` registry of the task base class it is compiled into.
//!
//! ## Usage
//!
//! ```bash
//! switchgen generate rules/cl.xml -o generated/Cl.cs
//! switchgen generate 'rules/*.xml' --out-dir generated
//! switchgen inspect rules/cl.xml
//! ```
//!
//! From code:
//!
//! ```
//! use switchgen::codegen::CodeGenerator;
//!
//! let source = CodeGenerator::default()
//!     .generate_str(r#"<Rule SwitchPrefix="-"><BoolProperty Name="Verbose" Switch="v"/></Rule>"#)
//!     .unwrap();
//! assert!(source.contains(r#"toolSwitch.SwitchValue = "-v";"#));
//! ```
//!
//! ## Modules
//!
//! - [`reader`] - Streaming rule schema reader
//! - [`codegen`] - Accessor rendering and the generation pass
//! - [`schema`] - Rule and property data model
//! - [`config`] - `switchgen.kdl` configuration
//! - [`inputs`] - Resolves files, directories and globs to schemas
//! - [`task`] - Build-host adapter that relays output to the log

pub mod cli;
pub mod codegen;
pub mod config;
pub mod error;
pub mod inputs;
pub mod reader;
pub mod schema;
pub mod task;
