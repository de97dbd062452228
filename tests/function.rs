#[macro_use]
mod common;

#[cfg(test)]
mod function {
    tests! {
        print_function in function is OK
        "<fn foo>"
        "<native fn clock>"
    }

    tests! {
        parameters in function is OK
        "6"
    }

    tests! {
        recursion in function is OK
        "55"
    }

    tests! {
        return_nil in function is OK
        "nil"
    }

    tests! {
        no_return_nil in function is OK
        "nil"
    }

    tests! {
        missing_arguments_err in function is ERR(70)
        "Expected 2 arguments but got 1."
        "[line 3]"
    }

    tests! {
        extra_arguments_err in function is ERR(70)
        "Expected 2 arguments but got 4."
        "[line 3]"
    }

    tests! {
        call_nonfunction_err in function is ERR(70)
        "Can only call functions and classes."
        "[line 1]"
    }

    tests! {
        call_nil_err in function is ERR(70)
        "Can only call functions and classes."
        "[line 1]"
    }
}
