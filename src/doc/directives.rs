/*!
# Header Directives

A P-file holds more than the program. Lines starting with `#!` restore
the rest of the machine state. A listing produced from a P-file begins
with the directives needed to rebuild it byte for byte.

```text
#!basic-start=100
#!dfile-collapsed
#!dfile:%S%C%O%R%E   0
#!basic-vars:[102,0,0,0,0,0]
#!system-vars:FRAMES=12345
#!system-vars:MEMBOT=[0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0,0]
```

 * `basic-start=N` runs the program from the first line numbered N or
   higher after loading. It must come before that line.
 * `dfile-collapsed` stores the screen with rows cut at their last
   character, the way a machine with 1K of memory does.
 * `dfile:` adds one screen row, written like the inside of a string.
 * `basic-vars:` appends bytes to the variables area.
 * `system-vars:NAME=VALUE` sets a system variable by name or by decimal
   address. Fields wider than two bytes take a list of bytes.

`D_FILE`, `DF_CC`, `VARS`, `E_LINE`, `CH_ADD`, `STKBOT`, `STKEND` and
`NXTLIN` are recomputed from the other contents. Setting them is allowed
but has no effect and produces a warning.
*/
