/// Concatenates supplied slices into one continuous vector.
#[macro_export]
macro_rules! concat_slices {
    ($($slice: expr),+) => {
        [$(&$slice[..]),+].concat()
    }
}

/// Return `$error` if `$left` not equals `$right`
#[macro_export]
macro_rules! expect_equality {
    ($left: expr, $right: expr, $error: expr) => {
        if $left != $right {
            return Err($error($left, $right));
        }
    };
}
