#[cfg(test)]
pub mod test {
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    use crate::model::{Rules, ValidationError};

    /// Nested section exercising every scalar kind.
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct EnvInner {
        pub str: String,
        pub skip: String,
        pub dur: Duration,
        pub b: bool,
        pub i: i64,
        pub u: u32,
        pub neg_u: u64,
        pub small: i8,
    }

    crate::env_struct!(EnvInner {
        str => "STR",
        skip => "-",
        dur => "DUR",
        b => "BOOL",
        i => "INT",
        u => "U",
        neg_u => "NEG_U",
        small,
    });

    /// Root config covering every field shape.
    #[derive(Debug, Default, Clone, PartialEq)]
    pub struct EnvCfg {
        pub s: String,
        pub api_key2fa: String,
        pub inner: EnvInner,
        pub ptr_inner: Option<EnvInner>,
        pub ptr_str: Option<String>,
        pub ptr_bool: Option<bool>,
        pub ptr_int: Option<i32>,
        pub ptr_dur: Option<Duration>,
        pub ptr_uint: Option<u16>,
        pub hidden: Option<EnvInner>,
    }

    crate::env_struct!(EnvCfg {
        s,
        api_key2fa,
        inner => "INNER",
        ptr_inner => "PINNER",
        ptr_str => "PSTR",
        ptr_bool => "PBOOL",
        ptr_int => "PINT",
        ptr_dur => "PDUR",
        ptr_uint => "PU",
        hidden => "-",
    });

    /// Small serializable config used by file and provider tests.
    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Sample {
        #[serde(default)]
        pub name: String,
        #[serde(default)]
        pub count: i64,
        #[serde(default)]
        pub port: u16,
        #[serde(default, with = "humantime_serde")]
        pub timeout: Duration,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub server: Option<SampleServer>,
    }

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    pub struct SampleServer {
        #[serde(default)]
        pub host: String,
        #[serde(default)]
        pub tls: bool,
    }

    crate::env_struct!(SampleServer { host, tls });
    crate::env_struct!(Sample { name, count, port, timeout, server });

    /// Rules that default `port` to 8080 and `name` to "svc", and require both
    /// `name` and `count` to be set.
    pub fn sample_rules() -> Rules<Sample> {
        Rules::new()
            .default_value("name", |c: &mut Sample| &mut c.name, "svc".to_string())
            .default_value("port", |c: &mut Sample| &mut c.port, 8080)
            .check("name", |c: &Sample| !c.name.is_empty(), "nonempty")
            .check("count", |c: &Sample| c.count != 0, "nonzero")
    }

    #[test]
    fn sample_rules_fill_and_validate() {
        use crate::model::Model;

        let rules = sample_rules();
        let mut sample = Sample::default();
        rules.set_defaults(&mut sample).unwrap();
        assert_eq!(sample.name, "svc");
        assert_eq!(sample.port, 8080);

        let err: ValidationError = rules.validate(&sample).unwrap_err();
        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.issues()[0].field, "count");
    }
}
