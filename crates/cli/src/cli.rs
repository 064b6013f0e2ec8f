//! Command-line surface.
//!
//! One closed set of subcommands, each a thin parameter struct; clap
//! prints usage and exits non-zero for an unknown or missing subcommand.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "s3ctl", version, about = "Operate Swifty S3-compatible object storage")]
pub struct Cli {
    /// Access token for the admin interface
    #[arg(long, global = true)]
    pub admin_secret: Option<String>,

    /// S3 service address
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    /// Access key
    #[arg(long, global = true)]
    pub access_key_id: Option<String>,

    /// Secret key
    #[arg(long, global = true)]
    pub secret_key_id: Option<String>,

    /// Key listing file to load credentials from
    #[arg(long, global = true)]
    pub conf: Option<PathBuf>,

    /// Suppress non-error output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate access keys
    Keygen(KeygenArgs),

    /// Delete the currently configured access key
    Keydel,

    /// Inspect or modify runtime parameters
    Sysctl(SysctlArgs),

    /// List buckets
    ListBuckets,

    /// List objects in a bucket
    ListObjects(ListObjectsArgs),

    /// List in-progress multipart uploads
    ListUploads(BucketArgs),

    /// Create a bucket
    BucketAdd(BucketAddArgs),

    /// Delete a bucket
    BucketDel(BucketArgs),

    /// Manage bucket static-website configuration
    BucketWeb(BucketWebArgs),

    /// Show bucket statistics
    BucketStat(BucketArgs),

    /// Create an object
    ObjectAdd(ObjectAddArgs),

    /// Get an object
    ObjectGet(ObjectGetArgs),

    /// Server-side copy an object
    ObjectCopy(ObjectCopyArgs),

    /// Delete an object
    ObjectDel(ObjectRefArgs),

    /// Initiate a multipart upload
    ObjectPartInit(PartInitArgs),

    /// Finalize a multipart upload
    ObjectPartFini(PartFiniArgs),

    /// Abort a multipart upload
    ObjectPartAbort(PartRefArgs),

    /// Upload one part of a multipart upload
    ObjectPartAdd(PartAddArgs),

    /// List uploaded parts
    ObjectPartList(PartRefArgs),

    /// Subscribe a queue to bucket put events
    Notify(NotifyArgs),
}

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Unique namespace
    #[arg(long)]
    pub namespace: String,

    /// Key lifetime in seconds, 0 for unbounded
    #[arg(long, default_value_t = 0)]
    pub lifetime: u32,

    /// Restrict the key to this bucket
    #[arg(long)]
    pub name: Option<String>,

    /// Save the issued keys in the credentials file
    #[arg(long)]
    pub save: bool,
}

#[derive(Args, Debug)]
pub struct SysctlArgs {
    /// Sysctl name; omit to list all
    #[arg(long)]
    pub name: Option<String>,

    /// New value; omit to read
    #[arg(long)]
    pub value: Option<String>,
}

#[derive(Args, Debug)]
pub struct BucketArgs {
    /// Bucket name
    #[arg(long)]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct BucketAddArgs {
    /// Bucket name; a random 6-char name is generated when omitted
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum WebAction {
    Get,
    Put,
    Del,
}

#[derive(Args, Debug)]
pub struct BucketWebArgs {
    /// Bucket name
    #[arg(long)]
    pub name: String,

    /// Action to perform
    #[arg(long, value_enum)]
    pub action: WebAction,
}

#[derive(Args, Debug)]
pub struct ListObjectsArgs {
    /// Bucket name
    #[arg(long)]
    pub name: String,

    /// Delimiter for grouping keys
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Maximum keys to fetch
    #[arg(long, default_value_t = 1000)]
    pub maxkeys: i32,

    /// Key prefix
    #[arg(long)]
    pub prefix: Option<String>,

    /// Continuation token
    #[arg(long)]
    pub token: Option<String>,

    /// Fetch object owners
    #[arg(long)]
    pub owner: bool,

    /// Start listing after this key
    #[arg(long)]
    pub after: Option<String>,
}

#[derive(Args, Debug)]
pub struct ObjectAddArgs {
    /// Bucket name
    #[arg(long)]
    pub name: String,

    /// Object key; a random 10-char key is generated when omitted
    #[arg(long)]
    pub key: Option<String>,

    /// Read the object body from this file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Generated body size in bytes when no file is given
    #[arg(long)]
    pub size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct ObjectGetArgs {
    /// Bucket name
    #[arg(long)]
    pub name: String,

    /// Object key
    #[arg(long)]
    pub key: Option<String>,

    /// Write the object body to this file instead of stdout
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Object size
    #[arg(long)]
    pub size: Option<usize>,

    /// Byte range to fetch, e.g. bytes=0-99
    #[arg(long)]
    pub range: Option<String>,
}

#[derive(Args, Debug)]
pub struct ObjectCopyArgs {
    /// Destination bucket name
    #[arg(long)]
    pub name: String,

    /// Destination object key
    #[arg(long)]
    pub key: String,

    /// Source bucket name
    #[arg(long)]
    pub src_name: String,

    /// Source object key
    #[arg(long)]
    pub src_key: String,
}

#[derive(Args, Debug)]
pub struct ObjectRefArgs {
    /// Bucket name
    #[arg(long)]
    pub name: String,

    /// Object key
    #[arg(long)]
    pub key: String,
}

#[derive(Args, Debug)]
pub struct PartInitArgs {
    /// Bucket name
    #[arg(long)]
    pub name: String,

    /// Object key; a random 10-char key is generated when omitted
    #[arg(long)]
    pub key: Option<String>,
}

#[derive(Args, Debug)]
pub struct PartFiniArgs {
    /// Bucket name
    #[arg(long)]
    pub name: String,

    /// Object key
    #[arg(long)]
    pub key: String,

    /// Upload id
    #[arg(long)]
    pub id: String,

    /// part:etag,[...] list
    #[arg(long)]
    pub list: String,
}

#[derive(Args, Debug)]
pub struct PartRefArgs {
    /// Bucket name
    #[arg(long)]
    pub name: String,

    /// Object key
    #[arg(long)]
    pub key: String,

    /// Upload id
    #[arg(long)]
    pub id: String,
}

#[derive(Args, Debug)]
pub struct PartAddArgs {
    /// Bucket name
    #[arg(long)]
    pub name: String,

    /// Object key
    #[arg(long)]
    pub key: String,

    /// Part number
    #[arg(long)]
    pub part: i32,

    /// Upload id
    #[arg(long)]
    pub id: String,

    /// Read the part body from this file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct NotifyArgs {
    /// Unique namespace
    #[arg(long)]
    pub namespace: String,

    /// Bucket name
    #[arg(long)]
    pub bucket: String,

    /// Queue to notify
    #[arg(long)]
    pub queue: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::Parser;

    #[test]
    fn test_cli_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "s3ctl",
            "--endpoint-url",
            "host:8787",
            "--access-key-id",
            "AKEY",
            "--secret-key-id",
            "SKEY",
            "--admin-secret",
            "tok",
            "list-buckets",
        ])
        .unwrap();

        assert_eq!(cli.endpoint_url.as_deref(), Some("host:8787"));
        assert_eq!(cli.access_key_id.as_deref(), Some("AKEY"));
        assert_eq!(cli.secret_key_id.as_deref(), Some("SKEY"));
        assert_eq!(cli.admin_secret.as_deref(), Some("tok"));
        assert!(matches!(cli.command, Command::ListBuckets));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["s3ctl", "list-buckets", "--endpoint-url", "host:8787"]).unwrap();
        assert_eq!(cli.endpoint_url.as_deref(), Some("host:8787"));
    }

    #[test]
    fn test_no_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["s3ctl"]).is_err());
        assert!(Cli::try_parse_from(["s3ctl", "frobnicate"]).is_err());
    }

    #[test]
    fn test_keygen() {
        let cli = Cli::try_parse_from([
            "s3ctl", "keygen", "--namespace", "ns", "--lifetime", "300", "--save",
        ])
        .unwrap();
        match cli.command {
            Command::Keygen(args) => {
                assert_eq!(args.namespace, "ns");
                assert_eq!(args.lifetime, 300);
                assert!(args.name.is_none());
                assert!(args.save);
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_keygen_requires_namespace() {
        assert!(Cli::try_parse_from(["s3ctl", "keygen"]).is_err());
    }

    #[test]
    fn test_sysctl_forms() {
        let cli = Cli::try_parse_from(["s3ctl", "sysctl"]).unwrap();
        match cli.command {
            Command::Sysctl(args) => {
                assert!(args.name.is_none());
                assert!(args.value.is_none());
            }
            _ => panic!("wrong command"),
        }

        let cli =
            Cli::try_parse_from(["s3ctl", "sysctl", "--name", "acc_max", "--value", "10"]).unwrap();
        match cli.command {
            Command::Sysctl(args) => {
                assert_eq!(args.name.as_deref(), Some("acc_max"));
                assert_eq!(args.value.as_deref(), Some("10"));
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_list_objects_defaults() {
        let cli = Cli::try_parse_from(["s3ctl", "list-objects", "--name", "b"]).unwrap();
        match cli.command {
            Command::ListObjects(args) => {
                assert_eq!(args.name, "b");
                assert_eq!(args.maxkeys, 1000);
                assert!(!args.owner);
                assert!(args.delimiter.is_none());
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_list_objects_requires_name() {
        assert!(Cli::try_parse_from(["s3ctl", "list-objects"]).is_err());
    }

    #[test]
    fn test_bucket_web_action() {
        let cli =
            Cli::try_parse_from(["s3ctl", "bucket-web", "--name", "b", "--action", "put"]).unwrap();
        match cli.command {
            Command::BucketWeb(args) => assert_eq!(args.action, WebAction::Put),
            _ => panic!("wrong command"),
        }

        assert!(
            Cli::try_parse_from(["s3ctl", "bucket-web", "--name", "b", "--action", "nuke"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["s3ctl", "bucket-web", "--name", "b"]).is_err());
    }

    #[test]
    fn test_object_copy_requires_source() {
        assert!(
            Cli::try_parse_from(["s3ctl", "object-copy", "--name", "b", "--key", "k"]).is_err()
        );

        let cli = Cli::try_parse_from([
            "s3ctl",
            "object-copy",
            "--name",
            "b",
            "--key",
            "k",
            "--src-name",
            "sb",
            "--src-key",
            "sk",
        ])
        .unwrap();
        match cli.command {
            Command::ObjectCopy(args) => {
                assert_eq!(args.src_name, "sb");
                assert_eq!(args.src_key, "sk");
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_part_fini_flags() {
        let cli = Cli::try_parse_from([
            "s3ctl",
            "object-part-fini",
            "--name",
            "b",
            "--key",
            "k",
            "--id",
            "uid",
            "--list",
            "1:abc,2:def",
        ])
        .unwrap();
        match cli.command {
            Command::ObjectPartFini(args) => {
                assert_eq!(args.id, "uid");
                assert_eq!(args.list, "1:abc,2:def");
            }
            _ => panic!("wrong command"),
        }

        // --list is required
        assert!(
            Cli::try_parse_from([
                "s3ctl",
                "object-part-fini",
                "--name",
                "b",
                "--key",
                "k",
                "--id",
                "uid",
            ])
            .is_err()
        );
    }

    #[test]
    fn test_part_add_number() {
        let cli = Cli::try_parse_from([
            "s3ctl",
            "object-part-add",
            "--name",
            "b",
            "--key",
            "k",
            "--part",
            "3",
            "--id",
            "uid",
        ])
        .unwrap();
        match cli.command {
            Command::ObjectPartAdd(args) => {
                assert_eq!(args.part, 3);
                assert!(args.file.is_none());
            }
            _ => panic!("wrong command"),
        }
    }

    #[test]
    fn test_notify_flags() {
        let cli = Cli::try_parse_from([
            "s3ctl", "notify", "--namespace", "ns", "--bucket", "b", "--queue", "q",
        ])
        .unwrap();
        match cli.command {
            Command::Notify(args) => {
                assert_eq!(args.namespace, "ns");
                assert_eq!(args.bucket, "b");
                assert_eq!(args.queue, "q");
            }
            _ => panic!("wrong command"),
        }

        assert!(Cli::try_parse_from(["s3ctl", "notify", "--namespace", "ns"]).is_err());
    }

    #[test]
    fn test_object_get_surface() {
        let cli = Cli::try_parse_from([
            "s3ctl",
            "object-get",
            "--name",
            "b",
            "--key",
            "k",
            "--range",
            "bytes=0-99",
            "--size",
            "64",
        ])
        .unwrap();
        match cli.command {
            Command::ObjectGet(args) => {
                assert_eq!(args.range.as_deref(), Some("bytes=0-99"));
                assert_eq!(args.size, Some(64));
            }
            _ => panic!("wrong command"),
        }
    }
}
