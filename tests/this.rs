#[macro_use]
mod common;

#[cfg(test)]
mod _this {
    tests! {
        in_method in this is OK
        "Egotist instance"
    }

    tests! {
        bound_method in this is OK
        "Jane"
    }

    // A bound method keeps its original `this`, wherever it ends up stored.
    tests! {
        rebound in this is OK
        "Jane"
    }

    tests! {
        at_top_level_err in this is ERR(65)
        "[line 1] Error at 'this': Can't use 'this' outside of a class."
    }

    tests! {
        in_function_err in this is ERR(65)
        "[line 2] Error at 'this': Can't use 'this' outside of a class."
    }
}
