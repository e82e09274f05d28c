//! Early-return helpers in the style of frame support. Every fallible function in Weft
//! returns a `Result`, and the error is converted with `Into` at the return site.

/// Return early with `Err($err.into())`.
#[macro_export]
macro_rules! fail {
    ( $err:expr ) => {{
        return Err($err.into());
    }};
}

/// Return early with `Err($err.into())` unless `$cond` holds.
#[macro_export]
macro_rules! ensure {
    ( $cond:expr, $err:expr $(,)? ) => {{
        if !$cond {
            $crate::fail!($err);
        }
    }};
}

#[cfg(test)]
mod tests {
    #[derive(Debug, PartialEq, Eq)]
    struct Wrapped(&'static str);

    impl From<&'static str> for Wrapped {
        fn from(reason: &'static str) -> Self {
            Self(reason)
        }
    }

    fn checked(value: u8) -> Result<u8, Wrapped> {
        crate::ensure!(value != 0, "zero");
        if value > 100 {
            crate::fail!("too big");
        }
        Ok(value)
    }

    #[test]
    fn errors_are_converted_at_the_return_site() {
        assert_eq!(checked(0), Err(Wrapped("zero")));
        assert_eq!(checked(101), Err(Wrapped("too big")));
        assert_eq!(checked(7), Ok(7));
    }
}
