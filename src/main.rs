// Copyright 2024. Felix Engl
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::app::args::SalticusArgs;
use crate::app::{configure_logging, Salticus};
use crate::config::Configs;
use clap::Parser;

mod app;
mod broker;
mod config;
mod fetch;
mod queue;
mod runtime;
mod seen;
mod url;
mod worker;

fn main() -> anyhow::Result<()> {
    let args = SalticusArgs::parse();
    // A missing .env is fine, the plain environment is enough.
    let _ = dotenvy::dotenv();
    let mut configs = Configs::from_env()?;
    args.apply_to(&mut configs);
    configure_logging(&configs)?;
    Salticus::new(configs).run()?;
    Ok(())
}
