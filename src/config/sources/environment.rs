//! Environment source: GIVENS__SECTION__KEY, e.g. GIVENS__NAMING__LINE_ENDING=lf

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("GIVENS")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
