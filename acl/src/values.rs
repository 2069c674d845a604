//! Enumerated values used by ACL resources and their entries.

use crate::{AclError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! enumerated {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            /// Every variant, in the order valid values are reported
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn names() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl FromStr for $name {
            type Err = AclError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(AclError::InvalidValue(format!(
                        "Invalid value {:?}. Valid values are {}",
                        s,
                        Self::names().join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

enumerated! {
    /// Access right granted or denied by an entry
    Right {
        Full => "full",
        Modify => "modify",
        Write => "write",
        Read => "read",
        List => "list",
        Execute => "execute",
    }
}

enumerated! {
    AceType {
        Allow => "allow",
        Deny => "deny",
    }
}

enumerated! {
    /// Which kinds of child objects inherit an entry
    ChildTypes {
        All => "all",
        Objects => "objects",
        Containers => "containers",
    }
}

enumerated! {
    /// How far down the tree an entry propagates
    Affects {
        All => "all",
        SelfOnly => "self_only",
        ChildrenOnly => "children_only",
        SelfAndDirectChildren => "self_and_direct_children",
        DirectChildrenOnly => "direct_children_only",
    }
}

enumerated! {
    /// Kind of object the ACL is attached to
    TargetType {
        File => "file",
    }
}

impl Default for AceType {
    fn default() -> Self {
        AceType::Allow
    }
}

impl Default for ChildTypes {
    fn default() -> Self {
        ChildTypes::All
    }
}

impl Default for Affects {
    fn default() -> Self {
        Affects::All
    }
}

impl Default for TargetType {
    fn default() -> Self {
        TargetType::File
    }
}
