#[macro_use]
mod common;

#[cfg(test)]
mod inheritance {
    tests! {
        inherit_method in inheritance is OK
        "Base.foo()"
    }

    tests! {
        overriding in inheritance is OK
        "Derived"
    }

    // The class arity comes from the inherited init.
    tests! {
        inherit_init in inheritance is OK
        "42"
    }

    tests! {
        from_nonclass_err in inheritance is ERR(70)
        "Superclass must be a class."
        "[line 2]"
    }

    tests! {
        self_inherit_err in inheritance is ERR(65)
        "[line 1] Error at 'Foo': A class cannot inherit from itself."
    }
}
