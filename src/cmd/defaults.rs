use crate::cmd::DefaultsArgs;
use stepctx::{
    Result,
    command::Prepared,
    flags::{CommandSpec, FlagError, ValueSource},
};
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "FLAG")]
    flag: String,
    #[tabled(rename = "VALUE")]
    value: String,
    #[tabled(rename = "SOURCE")]
    source: String,
}

impl DefaultsArgs {
    fn explicit(&self, name: &str) -> Option<String> {
        match name {
            "ca-url" => self.ca_url.clone(),
            "fingerprint" => self.fingerprint.clone(),
            "root" => self.root.clone(),
            "not-after" => self.not_after.clone(),
            "san" if !self.san.is_empty() => Some(self.san.join(",")),
            _ => None,
        }
    }
}

pub fn handle(args: &DefaultsArgs, spec: &CommandSpec, prepared: &Prepared) -> Result<()> {
    let mut rows = Vec::new();

    for flag in &spec.flags {
        let name = flag.primary();

        if let Some(raw) = args.explicit(name) {
            let value = flag
                .kind
                .parse_str(&raw)
                .map_err(|reason| FlagError::InvalidValue {
                    flag: name.to_owned(),
                    origin: ValueSource::CommandLine,
                    value: raw.clone(),
                    reason,
                })?;
            rows.push(Row {
                flag: name.to_owned(),
                value: value.to_string(),
                source: ValueSource::CommandLine.to_string(),
            });
            continue;
        }

        if let Some(bound) = prepared.bound.iter().find(|b| b.name == name) {
            rows.push(Row {
                flag: name.to_owned(),
                value: bound.value.to_string(),
                source: format!("{} ({})", bound.source, bound.key),
            });
        }
    }

    if rows.is_empty() {
        println!("No flag has a value.");
    } else {
        println!("{}", Table::new(rows).with(Style::blank()));
    }

    for path in &prepared.config.sources {
        println!("loaded {}", path.display());
    }

    Ok(())
}
